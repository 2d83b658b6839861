//! Word pools for placeholder values.

use astro_rules::{Area, Intensity, Tone};

/// Adjectives for `{descriptor}`.
pub fn tone_descriptors(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Support => &["supportive", "encouraging", "open", "favorable", "warm"],
        Tone::Challenge => &["demanding", "testing", "exacting", "stretching", "pressured"],
        Tone::Neutral => &["steady", "even", "measured", "balanced", "quiet"],
    }
}

/// Stronger descriptors replace the tone pool at the loud end of the scale.
pub fn intensity_descriptors(tone: Tone, intensity: Intensity) -> Option<&'static [&'static str]> {
    match (tone, intensity) {
        (Tone::Support, Intensity::Major | Intensity::Strong) => {
            Some(&["powerful", "generous", "expansive"][..])
        }
        (Tone::Challenge, Intensity::Major | Intensity::Strong) => {
            Some(&["intense", "heavy", "high-stakes"][..])
        }
        (_, Intensity::Background) => Some(&["quiet", "subtle", "low-key"][..]),
        _ => None,
    }
}

/// Noun phrases for `{focus}`.
pub fn area_focus(area: Area) -> &'static [&'static str] {
    match area {
        Area::Career => &["your professional path", "work priorities", "long-range goals"],
        Area::Love => &["your closest relationships", "emotional honesty", "shared plans"],
        Area::Health => &["daily routines", "your energy levels", "rest and recovery"],
        Area::Finance => &["spending choices", "your resources", "long-term security"],
        Area::General => &["your overall direction", "the bigger picture", "personal priorities"],
    }
}

/// Verb phrases recommended when the influence supports you.
pub fn do_phrases(area: Area) -> &'static [&'static str] {
    match area {
        Area::Career => &[
            "review priorities",
            "plan the next milestone",
            "share progress with a mentor",
        ],
        Area::Love => &[
            "listen before responding",
            "plan quality time",
            "share one honest feeling",
        ],
        Area::Health => &[
            "rest between demanding tasks",
            "take a short walk",
            "keep meals regular",
        ],
        Area::Finance => &[
            "review recurring expenses",
            "track spending for a week",
            "set a savings target",
        ],
        Area::General => &[
            "pause before big decisions",
            "keep plans simple",
            "write down one clear intention",
        ],
    }
}

/// Verb phrases to hold back on while an influence is challenging.
pub fn avoid_phrases(area: Area) -> &'static [&'static str] {
    match area {
        Area::Career => &[
            "overcommit to new projects",
            "push deadlines too hard",
            "react to criticism quickly",
        ],
        Area::Love => &[
            "force difficult conversations",
            "assume the worst",
            "react to old hurts",
        ],
        Area::Health => &[
            "skip rest days",
            "overschedule the week",
            "ignore early signs of fatigue",
        ],
        Area::Finance => &[
            "make impulse purchases",
            "sign contracts in a rush",
            "lend money without clear terms",
        ],
        Area::General => &["rush key decisions", "overcommit your time", "force outcomes"],
    }
}

/// Phrase pool for an event of the given tone.
pub fn action_phrases(area: Area, tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Challenge => avoid_phrases(area),
        Tone::Support | Tone::Neutral => do_phrases(area),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammaticalType, PhraseToken};

    #[test]
    fn test_every_action_phrase_is_a_verb_phrase() {
        for area in Area::ALL {
            for phrase in do_phrases(area).iter().chain(avoid_phrases(area)) {
                let token = PhraseToken::classify(phrase).unwrap();
                assert_eq!(token.grammatical_type, GrammaticalType::VerbPhrase, "{phrase}");
                assert!(token.transform(GrammaticalType::Gerund).is_ok(), "{phrase}");
            }
        }
    }

    #[test]
    fn test_pools_are_non_empty() {
        for area in Area::ALL {
            assert!(!area_focus(area).is_empty());
        }
        for tone in Tone::ALL {
            assert!(!tone_descriptors(tone).is_empty());
        }
    }

    #[test]
    fn test_challenge_uses_avoid_pool() {
        assert_eq!(action_phrases(Area::Finance, Tone::Challenge), avoid_phrases(Area::Finance));
        assert_eq!(action_phrases(Area::Finance, Tone::Neutral), do_phrases(Area::Finance));
    }
}
