//! Per-area content guardrails.
//!
//! - banned words and bigrams, replaced where a safe wording exists and
//!   otherwise dropping the sentence
//! - a maximum sentence length, split at clause boundaries before trimming
//! - de-duplication against the last few sentences
//! - a disclaimer suffix for health and finance

use astro_rules::{Area, GuardrailConfig};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::polish::{capitalize_first, ensure_terminal, is_substantive, split_sentences};

/// A term that must not appear in narrative text.
#[derive(Debug, Clone)]
pub struct BannedTerm {
    pub term: String,
    /// Safe wording; `None` drops the whole sentence.
    pub replacement: Option<String>,
    pattern: Option<Regex>,
}

impl BannedTerm {
    pub fn new(term: impl Into<String>, replacement: Option<&str>) -> Self {
        let term = term.into();
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&term))).ok();
        Self {
            term,
            replacement: replacement.map(str::to_string),
            pattern,
        }
    }

    pub fn dropping(term: impl Into<String>) -> Self {
        Self::new(term, None)
    }

    pub fn replacing(term: impl Into<String>, replacement: &str) -> Self {
        Self::new(term, Some(replacement))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    fn apply(&self, text: &str) -> Option<String> {
        match (&self.pattern, &self.replacement) {
            (Some(pattern), Some(replacement)) => {
                Some(pattern.replace_all(text, replacement.as_str()).into_owned())
            }
            (Some(pattern), None) if pattern.is_match(text) => None,
            _ => Some(text.to_string()),
        }
    }
}

/// Rules for one area.
#[derive(Debug, Clone, Default)]
pub struct AreaRules {
    pub banned: Vec<BannedTerm>,
    pub disclaimer: Option<String>,
}

impl AreaRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ban(mut self, term: BannedTerm) -> Self {
        self.banned.push(term);
        self
    }

    pub fn with_disclaimer(mut self, disclaimer: impl Into<String>) -> Self {
        self.disclaimer = Some(disclaimer.into());
        self
    }
}

static CLAUSE_BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\s*;\s*|,\s+(?:and|but|while|as|so)\s+").ok());

#[derive(Debug, Clone)]
pub struct Guardrails {
    config: GuardrailConfig,
    /// Applied to every area.
    shared: Vec<BannedTerm>,
    areas: BTreeMap<Area, AreaRules>,
}

impl Guardrails {
    /// Empty rule set; only length, de-duplication and toggles apply.
    pub fn new(config: GuardrailConfig) -> Self {
        Self {
            config,
            shared: Vec::new(),
            areas: BTreeMap::new(),
        }
    }

    /// Standard banned terms and disclaimers with the given limits.
    pub fn standard(config: GuardrailConfig) -> Self {
        Self::new(config)
            .with_shared(BannedTerm::replacing("doom", "difficulty"))
            .with_shared(BannedTerm::replacing("disaster", "setback"))
            .with_shared(BannedTerm::replacing("catastrophe", "setback"))
            .with_shared(BannedTerm::replacing("cursed", "stuck"))
            .with_shared(BannedTerm::dropping("fated to"))
            .with_area(
                Area::Health,
                AreaRules::new()
                    .ban(BannedTerm::dropping("diagnose"))
                    .ban(BannedTerm::dropping("diagnosis"))
                    .ban(BannedTerm::dropping("cure"))
                    .ban(BannedTerm::dropping("prescribe"))
                    .ban(BannedTerm::dropping("prescription"))
                    .ban(BannedTerm::dropping("treat"))
                    .ban(BannedTerm::dropping("treatment"))
                    .ban(BannedTerm::replacing("medication", "care plan"))
                    .ban(BannedTerm::replacing("illness", "strain"))
                    .ban(BannedTerm::replacing("disease", "strain"))
                    .with_disclaimer("This is general guidance, not medical advice."),
            )
            .with_area(
                Area::Finance,
                AreaRules::new()
                    .ban(BannedTerm::dropping("guaranteed"))
                    .ban(BannedTerm::dropping("risk-free"))
                    .ban(BannedTerm::dropping("get rich"))
                    .ban(BannedTerm::replacing("invest now", "review options"))
                    .ban(BannedTerm::replacing("windfall", "opportunity"))
                    .ban(BannedTerm::replacing("bankruptcy", "financial strain"))
                    .with_disclaimer("This is general guidance, not financial advice."),
            )
            .with_area(
                Area::Love,
                AreaRules::new()
                    .ban(BannedTerm::replacing("soulmate", "close partner"))
                    .ban(BannedTerm::replacing("breakup", "distance"))
                    .ban(BannedTerm::dropping("cheating")),
            )
            .with_area(
                Area::Career,
                AreaRules::new()
                    .ban(BannedTerm::replacing("fired", "challenged"))
                    .ban(BannedTerm::replacing("quit your job", "review your options")),
            )
    }

    pub fn with_defaults() -> Self {
        Self::standard(GuardrailConfig::default())
    }

    pub fn with_shared(mut self, term: BannedTerm) -> Self {
        self.shared.push(term);
        self
    }

    pub fn with_area(mut self, area: Area, rules: AreaRules) -> Self {
        self.areas.insert(area, rules);
        self
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    fn banned_for(&self, area: Area) -> impl Iterator<Item = &BannedTerm> {
        self.shared
            .iter()
            .chain(self.areas.get(&area).into_iter().flat_map(|r| r.banned.iter()))
    }

    pub fn disclaimer(&self, area: Area) -> Option<&str> {
        self.areas.get(&area).and_then(|r| r.disclaimer.as_deref())
    }

    /// Banned terms present in `text` for `area`.
    pub fn violations(&self, text: &str, area: Area) -> Vec<String> {
        self.banned_for(area)
            .filter(|t| t.is_match(text))
            .map(|t| t.term.clone())
            .collect()
    }

    /// Replace or drop banned terms. `None` when the sentence must go.
    pub fn scrub_sentence(&self, sentence: &str, area: Area) -> Option<String> {
        let mut text = sentence.to_string();
        for term in self.banned_for(area) {
            if !term.is_match(&text) {
                continue;
            }
            match term.apply(&text) {
                Some(replaced) => {
                    debug!(area = area.as_str(), term = %term.term, "replaced banned term");
                    text = replaced;
                }
                None => {
                    debug!(area = area.as_str(), term = %term.term, "dropped sentence with banned term");
                    return None;
                }
            }
        }
        Some(text)
    }

    /// Split an over-long sentence at clause boundaries, then trim what is still too long.
    pub fn cap_length(&self, sentence: &str) -> Vec<String> {
        let max = self.config.max_sentence_words;
        if sentence.split_whitespace().count() <= max {
            return vec![sentence.to_string()];
        }

        let pieces: Vec<String> = match CLAUSE_BREAK.as_ref() {
            Some(re) => re.split(sentence).map(str::to_string).collect(),
            None => vec![sentence.to_string()],
        };

        pieces
            .iter()
            .map(|piece| {
                let words: Vec<&str> = piece.split_whitespace().collect();
                let kept = if words.len() > max { &words[..max] } else { &words[..] };
                ensure_terminal(&capitalize_first(&kept.join(" ")))
            })
            .filter(|s| is_substantive(s))
            .collect()
    }

    /// Full guardrail pass over polished prose.
    pub fn apply(&self, text: &str, area: Area) -> String {
        let mut kept: Vec<String> = Vec::new();

        for sentence in split_sentences(text) {
            let Some(scrubbed) = self.scrub_sentence(&sentence, area) else {
                continue;
            };
            for piece in self.cap_length(&scrubbed) {
                let normalized = normalize(&piece);
                let window_start = kept.len().saturating_sub(self.config.dedupe_window);
                if kept[window_start..].iter().any(|k| normalize(k) == normalized) {
                    debug!(area = area.as_str(), sentence = %piece, "dropped repeated sentence");
                    continue;
                }
                kept.push(piece);
            }
        }

        if self.config.disclaimers && !kept.is_empty() {
            if let Some(disclaimer) = self.disclaimer(area) {
                if !kept.iter().any(|s| s == disclaimer) {
                    kept.push(disclaimer.to_string());
                }
            }
        }

        kept.join(" ")
    }
}

impl Default for Guardrails {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize(sentence: &str) -> String {
    sentence
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_keeps_sentence() {
        let g = Guardrails::with_defaults();
        let text = g.apply("This is no disaster. Keep going.", Area::General);
        assert_eq!(text, "This is no setback. Keep going.");
    }

    #[test]
    fn test_unreplaceable_term_drops_sentence() {
        let g = Guardrails::with_defaults();
        let text = g.apply("A guaranteed return is coming. Review your budget.", Area::Finance);
        assert!(!text.contains("guaranteed"));
        assert!(text.starts_with("Review your budget."));
    }

    #[test]
    fn test_terms_are_area_specific() {
        let g = Guardrails::with_defaults();
        assert_eq!(g.violations("Find a cure for boredom.", Area::Health), vec!["cure"]);
        assert!(g.violations("Find a cure for boredom.", Area::Career).is_empty());
        assert!(g.violations("Secure your future.", Area::Health).is_empty());
    }

    #[test]
    fn test_health_drops_medical_instructions() {
        let g = Guardrails::with_defaults();
        let text = g.apply(
            "Treat the ache with rest. Ask someone to prescribe something. Take a slow walk.",
            Area::Health,
        );
        assert!(text.starts_with("Take a slow walk."), "{text}");
        assert!(g.violations("Plan a treatment.", Area::Health).contains(&"treatment".to_string()));
        assert!(g.violations("Treat the ache with rest.", Area::Love).is_empty());
    }

    #[test]
    fn test_long_sentence_split_at_clause() {
        let config = GuardrailConfig {
            max_sentence_words: 8,
            ..Default::default()
        };
        let g = Guardrails::new(config);
        let pieces = g.cap_length("Review the plan with your team today, and then set one clear goal for tomorrow morning.");
        assert_eq!(
            pieces,
            vec!["Review the plan with your team today.", "Then set one clear goal for tomorrow morning."]
        );
    }

    #[test]
    fn test_long_clause_is_trimmed() {
        let config = GuardrailConfig {
            max_sentence_words: 6,
            ..Default::default()
        };
        let g = Guardrails::new(config);
        let pieces = g.cap_length("one two three four five six seven eight nine ten");
        assert_eq!(pieces, vec!["One two three four five six."]);
    }

    #[test]
    fn test_dedupe_window() {
        let g = Guardrails::new(GuardrailConfig::default());
        let text = g.apply("Rest well. Rest well! Take a walk.", Area::General);
        assert_eq!(text, "Rest well. Take a walk.");
    }

    #[test]
    fn test_disclaimer_appended_once() {
        let g = Guardrails::with_defaults();
        let once = g.apply("Take a short walk.", Area::Health);
        assert!(once.ends_with("not medical advice."));
        let twice = g.apply(&once, Area::Health);
        assert_eq!(once, twice);

        let off = Guardrails::standard(GuardrailConfig {
            disclaimers: false,
            ..Default::default()
        });
        assert_eq!(off.apply("Take a short walk.", Area::Health), "Take a short walk.");
    }
}
