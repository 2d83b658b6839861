//! Driver microcopy - short canned insights for recognized transit patterns.

use astro_rules::{AspectFamily, Body, Event};

use crate::polish::split_sentences;

struct DriverPattern {
    transit: Option<Body>,
    family: Option<AspectFamily>,
    natal: Option<Body>,
    hint: &'static str,
}

impl DriverPattern {
    fn new(
        transit: Option<Body>,
        family: Option<AspectFamily>,
        natal: Option<Body>,
        hint: &'static str,
    ) -> Self {
        Self {
            transit,
            family,
            natal,
            hint,
        }
    }

    fn matches(&self, event: &Event) -> bool {
        self.transit.as_ref().map_or(true, |b| *b == event.transit_body)
            && self.family.map_or(true, |f| f == event.aspect.family())
            && self.natal.as_ref().map_or(true, |b| *b == event.natal_body)
    }
}

// Most specific first.
fn patterns() -> [DriverPattern; 10] {
    use AspectFamily::*;
    [
        DriverPattern::new(Some(Body::Saturn), Some(Hard), Some(Body::Venus),
            "Commitments may feel heavier than usual, so be clear about expectations."),
        DriverPattern::new(Some(Body::Mars), Some(Harmonious), Some(Body::Chiron),
            "Gentle movement can help old tension release."),
        DriverPattern::new(Some(Body::Saturn), Some(Hard), None,
            "Slow, steady effort pays off more than force."),
        DriverPattern::new(Some(Body::Mars), Some(Hard), None,
            "Pace yourself, because quick reactions cost more than usual."),
        DriverPattern::new(Some(Body::Mercury), Some(Hard), None,
            "Double-check messages before sending them."),
        DriverPattern::new(Some(Body::Jupiter), Some(Harmonious), None,
            "Generosity tends to come back around now."),
        DriverPattern::new(Some(Body::Venus), Some(Harmonious), None,
            "Small gestures of appreciation land well."),
        DriverPattern::new(Some(Body::Uranus), None, None,
            "Leave a little room in your plans for surprises."),
        DriverPattern::new(Some(Body::Moon), None, None,
            "Moods shift quickly, so give feelings a little room."),
        DriverPattern::new(None, Some(Adjusting), None,
            "Small course corrections work better than big overhauls."),
    ]
}

/// The first hint whose pattern matches `event`.
pub fn hint_for(event: &Event) -> Option<&'static str> {
    patterns().into_iter().find(|p| p.matches(event)).map(|p| p.hint)
}

/// Insert `hint` before the paragraph's closing sentence, unless it is already there.
pub fn inject(paragraph: &str, hint: &str) -> String {
    if paragraph.contains(hint) {
        return paragraph.to_string();
    }
    let mut sentences = split_sentences(paragraph);
    let at = sentences.len().saturating_sub(1);
    sentences.insert(at, hint.to_string());
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_rules::Aspect;
    use chrono::NaiveDate;

    fn event(transit: Body, aspect: Aspect, natal: Body) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        Event::new(date, transit, natal, aspect, 1.0)
    }

    #[test]
    fn test_most_specific_pattern_wins() {
        let hint = hint_for(&event(Body::Saturn, Aspect::Square, Body::Venus)).unwrap();
        assert!(hint.starts_with("Commitments"));
        let hint = hint_for(&event(Body::Saturn, Aspect::Opposition, Body::Sun)).unwrap();
        assert!(hint.starts_with("Slow, steady"));
    }

    #[test]
    fn test_unmatched_event_has_no_hint() {
        assert!(hint_for(&event(Body::Sun, Aspect::Trine, Body::Moon)).is_none());
    }

    #[test]
    fn test_inject_before_closer_once() {
        let paragraph = "Opening line here. Middle line here. Closing line here.";
        let injected = inject(paragraph, "A hint goes here.");
        assert_eq!(
            injected,
            "Opening line here. Middle line here. A hint goes here. Closing line here."
        );
        assert_eq!(inject(&injected, "A hint goes here."), injected);
    }
}
