//! Event tokens - a whitelist of sanitized descriptors for evidence clauses.
//!
//! Only these tokens ever reach narrative text from an event; free-form
//! upstream strings (notes, unknown body names) are reduced to plain words.

use astro_rules::{Area, Aspect, Event};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Most words a sanitized free-text token may keep.
pub const MAX_TOKEN_WORDS: usize = 5;

static WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:['-][A-Za-z0-9]+)?").ok());

/// Keep plain words only, at most `max_words` of them.
pub fn sanitize(text: &str, max_words: usize) -> String {
    let Some(re) = WORD.as_ref() else {
        return String::new();
    };
    re.find_iter(text)
        .map(|m| m.as_str())
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn aspect_verb(aspect: Aspect) -> &'static str {
    match aspect {
        Aspect::Conjunction => "aligns with",
        Aspect::Opposition => "balances",
        Aspect::Square => "presses on",
        Aspect::Trine => "flows with",
        Aspect::Sextile => "supports",
        Aspect::Quincunx => "nudges",
    }
}

pub fn aspect_family_label(aspect: Aspect) -> &'static str {
    match aspect {
        Aspect::Conjunction => "blending conjunction",
        Aspect::Opposition => "balancing opposition",
        Aspect::Square => "pressing square",
        Aspect::Trine => "flowing trine",
        Aspect::Sextile => "supportive sextile",
        Aspect::Quincunx => "adjusting quincunx",
    }
}

pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// "7th house" for houses 1 to 12.
pub fn house_label(house: Option<u8>) -> Option<String> {
    house
        .filter(|h| (1..=12).contains(h))
        .map(|h| format!("{} house", ordinal(u32::from(h))))
}

/// Whitelisted tokens for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTokens {
    pub transit_body: String,
    pub natal_body: String,
    pub aspect_verb: String,
    pub aspect_family: String,
    pub house_label: Option<String>,
    pub focus: Option<String>,
}

impl EventTokens {
    pub fn from_event(event: &Event) -> Self {
        Self {
            transit_body: sanitize(event.transit_body.name(), MAX_TOKEN_WORDS),
            natal_body: sanitize(event.natal_body.name(), MAX_TOKEN_WORDS),
            aspect_verb: aspect_verb(event.aspect).to_string(),
            aspect_family: aspect_family_label(event.aspect).to_string(),
            house_label: house_label(event.natal_house),
            focus: event
                .focus
                .iter()
                .map(|f| sanitize(f, MAX_TOKEN_WORDS))
                .find(|f| !f.is_empty()),
        }
    }

    /// One-clause description of the event, or `None` when nothing usable survived.
    pub fn phrase(&self) -> Option<String> {
        if self.transit_body.is_empty() {
            return None;
        }
        if self.natal_body.is_empty() {
            return Some(match &self.house_label {
                Some(house) => format!("{} activates your {}", self.transit_body, house),
                None => format!("{} adds its influence", self.transit_body),
            });
        }
        Some(match &self.house_label {
            Some(house) => format!(
                "{} {} your {} in the {}, a {} influence",
                self.transit_body, self.aspect_verb, self.natal_body, house, self.aspect_family
            ),
            None => format!(
                "{} {} your {}, a {} influence",
                self.transit_body, self.aspect_verb, self.natal_body, self.aspect_family
            ),
        })
    }
}

/// Connector templates joining a primary and a supporting clause.
pub fn connectors(area: Area) -> &'static [&'static str] {
    match area {
        Area::Career => &[
            "{primary} while {supporting}",
            "{primary}; meanwhile, {supporting}",
            "{primary}. In your workflow, {supporting}",
        ],
        Area::Love => &[
            "{primary} while {supporting}",
            "{primary}. Heart-wise, {supporting}",
            "{primary}; in your closest bonds, {supporting}",
        ],
        Area::Health => &[
            "{primary} while {supporting}",
            "{primary}. For your body, {supporting}",
            "{primary}; in your routines, {supporting}",
        ],
        Area::Finance => &[
            "{primary} while {supporting}",
            "{primary}. Money-wise, {supporting}",
            "{primary}; on the budget side, {supporting}",
        ],
        Area::General => &["{primary} while {supporting}", "{primary}; meanwhile, {supporting}"],
    }
}

/// Evidence sentence for the primary event, joined with the supporting one when present.
pub fn evidence_clause(area: Area, primary: &Event, supporting: Option<&Event>, seed: u64) -> String {
    let primary_phrase = EventTokens::from_event(primary).phrase();
    let supporting_phrase = supporting.and_then(|e| EventTokens::from_event(e).phrase());

    match (primary_phrase, supporting_phrase) {
        (Some(p), Some(s)) if p != s => {
            let options = connectors(area);
            let template = options[(seed % options.len() as u64) as usize];
            template.replace("{primary}", &p).replace("{supporting}", &s)
        }
        (Some(p), _) => p,
        (None, Some(s)) => s,
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_rules::Body;
    use chrono::NaiveDate;

    fn event(transit: Body, aspect: Aspect, natal: Body) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        Event::new(date, transit, natal, aspect, 1.0)
    }

    #[test]
    fn test_ordinals() {
        let labels: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22].iter().map(|n| ordinal(*n)).collect();
        assert_eq!(labels, vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd"]);
        assert_eq!(house_label(Some(7)).as_deref(), Some("7th house"));
        assert_eq!(house_label(Some(13)), None);
    }

    #[test]
    fn test_event_phrase_with_house() {
        let e = event(Body::Saturn, Aspect::Square, Body::Venus).with_house(7);
        assert_eq!(
            EventTokens::from_event(&e).phrase().unwrap(),
            "Saturn presses on your Venus in the 7th house, a pressing square influence"
        );
    }

    #[test]
    fn test_unknown_body_is_sanitized() {
        let e = event(Body::parse("Eris<script>"), Aspect::Trine, Body::Sun);
        let phrase = EventTokens::from_event(&e).phrase().unwrap();
        assert!(phrase.starts_with("Eris script flows with your Sun"));
        assert!(!phrase.contains('<'));
    }

    #[test]
    fn test_evidence_joins_supporting() {
        let primary = event(Body::Mars, Aspect::Trine, Body::Chiron);
        let supporting = event(Body::Venus, Aspect::Sextile, Body::Moon);
        let clause = evidence_clause(Area::Career, &primary, Some(&supporting), 0);
        assert_eq!(
            clause,
            "Mars flows with your Chiron, a flowing trine influence while Venus supports your Moon, a supportive sextile influence"
        );
        assert_eq!(evidence_clause(Area::Career, &primary, Some(&primary), 0), EventTokens::from_event(&primary).phrase().unwrap());
    }
}
