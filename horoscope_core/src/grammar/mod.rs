//! Phrase safety: typed phrase tokens and template-aware transforms.
//!
//! A phrase inserted into a template is first classified, then transformed
//! into the grammatical type the template position expects. When no transform
//! is determinable the caller substitutes a fallback phrase instead of
//! emitting ungrammatical text.

mod inflection;

pub use inflection::*;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::error::GrammarError;

/// Longest phrase (in words) allowed into a template.
pub const MAX_PHRASE_WORDS: usize = 6;

/// Default substitute when a phrase cannot be made to fit.
pub const DEFAULT_FALLBACK: &str = "focused progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalType {
    /// "reviewing priorities"
    Gerund,
    /// "review priorities"
    VerbPhrase,
    /// "priorities", "focus"
    Noun,
    /// "steady progress"
    AdjectiveNoun,
}

/// A phrase together with its grammatical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseToken {
    pub text: String,
    pub grammatical_type: GrammaticalType,
}

impl PhraseToken {
    /// Classify a phrase by its head word.
    pub fn classify(text: &str) -> Result<Self, GrammarError> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();
        let Some(head) = words.first() else {
            return Err(GrammarError::Empty);
        };
        let head_lower = head.to_ascii_lowercase();

        let grammatical_type = if head_lower.ends_with("ing") && head_lower.len() > 4 {
            GrammaticalType::Gerund
        } else if is_known_verb(&head_lower) {
            GrammaticalType::VerbPhrase
        } else if words.len() >= 2 && is_known_adjective(&head_lower) {
            GrammaticalType::AdjectiveNoun
        } else {
            GrammaticalType::Noun
        };

        Ok(Self {
            text,
            grammatical_type,
        })
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Rewrite the phrase as `expected`, or explain why it cannot be done.
    pub fn transform(&self, expected: GrammaticalType) -> Result<PhraseToken, GrammarError> {
        use GrammaticalType::*;

        let untransformable = || GrammarError::Untransformable {
            text: self.text.clone(),
            found: self.grammatical_type,
            expected,
        };

        let text = match (self.grammatical_type, expected) {
            (found, wanted) if found == wanted => self.text.clone(),
            // Gerunds work anywhere a noun does.
            (Gerund, Noun) => self.text.clone(),
            (VerbPhrase, Gerund) => {
                let mut words = self.text.split_whitespace();
                let head = words.next().ok_or(GrammarError::Empty)?;
                std::iter::once(gerund(head))
                    .chain(words.map(str::to_string))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            (VerbPhrase, Noun) if self.word_count() == 1 && is_noun_verb(&self.text) => {
                self.text.to_ascii_lowercase()
            }
            (AdjectiveNoun, Noun) => self.text.clone(),
            _ => return Err(untransformable()),
        };

        if text.split_whitespace().count() > MAX_PHRASE_WORDS {
            return Err(GrammarError::TooLong {
                text,
                max: MAX_PHRASE_WORDS,
            });
        }

        Ok(PhraseToken {
            text,
            grammatical_type: expected,
        })
    }
}

/// How a phrase must look in a particular template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRequirements {
    /// Expected type; inferred from the template when absent.
    #[serde(default)]
    pub expected: Option<GrammaticalType>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
    #[serde(default)]
    pub lowercase: bool,
    #[serde(default)]
    pub add_article: bool,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

impl Default for PhraseRequirements {
    fn default() -> Self {
        Self {
            expected: None,
            fallback: default_fallback(),
            lowercase: true,
            add_article: false,
        }
    }
}

impl PhraseRequirements {
    pub fn expecting(expected: GrammaticalType) -> Self {
        Self {
            expected: Some(expected),
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_article(mut self) -> Self {
        self.add_article = true;
        self
    }
}

static GERUND_CONTEXT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(focus\s+on|keep|practice|avoid|skip|hold\s+back\s+from|consider|stop|resist|enjoy|start)\s+\{phrase\}",
    )
    .ok()
});

static VERB_CONTEXT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|[.!?]\s+|\bto\s+|\band\s+|\bthen\s+|\bnot\s+)\{phrase\}").ok()
});

static NOUN_CONTEXT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(the|your|a|an|some|more|for|with|about)\s+\{phrase\}").ok()
});

/// Infer what a `{phrase}` slot expects from the words around it.
pub fn infer_expected(template: &str) -> Option<GrammaticalType> {
    let hit = |re: &LazyLock<Option<Regex>>| re.as_ref().is_some_and(|r| r.is_match(template));
    if hit(&GERUND_CONTEXT) {
        Some(GrammaticalType::Gerund)
    } else if hit(&NOUN_CONTEXT) {
        Some(GrammaticalType::Noun)
    } else if hit(&VERB_CONTEXT) {
        Some(GrammaticalType::VerbPhrase)
    } else {
        None
    }
}

/// Produce text safe to drop into `template`'s `{phrase}` slot.
///
/// Never fails: unresolvable phrases become `requirements.fallback`.
pub fn safe_phrase(phrase: &str, template: &str, requirements: &PhraseRequirements) -> String {
    let expected = requirements.expected.or_else(|| infer_expected(template));

    let resolved = PhraseToken::classify(phrase).and_then(|token| match expected {
        Some(expected) => token.transform(expected),
        None if token.word_count() <= MAX_PHRASE_WORDS => Ok(token),
        None => Err(GrammarError::TooLong {
            text: token.text,
            max: MAX_PHRASE_WORDS,
        }),
    });

    let mut text = match resolved {
        Ok(token) => token.text,
        Err(error) => {
            warn!(%error, template, "phrase transform failed, using fallback");
            requirements.fallback.clone()
        }
    };

    if requirements.lowercase {
        text = text.to_lowercase();
    }
    if requirements.add_article {
        text = with_article(&text);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let t = |s: &str| PhraseToken::classify(s).unwrap().grammatical_type;
        assert_eq!(t("reviewing priorities"), GrammaticalType::Gerund);
        assert_eq!(t("review priorities"), GrammaticalType::VerbPhrase);
        assert_eq!(t("focus"), GrammaticalType::VerbPhrase);
        assert_eq!(t("steady progress"), GrammaticalType::AdjectiveNoun);
        assert_eq!(t("relationships"), GrammaticalType::Noun);
        assert!(matches!(PhraseToken::classify("   "), Err(GrammarError::Empty)));
    }

    #[test]
    fn test_focus_on_focus_becomes_gerund() {
        let template = "Focus on {phrase}";
        let phrase = safe_phrase("focus", template, &PhraseRequirements::default());
        assert_eq!(template.replace("{phrase}", &phrase), "Focus on focusing");
    }

    #[test]
    fn test_verb_phrase_to_gerund_keeps_tail() {
        let token = PhraseToken::classify("make impulse purchases").unwrap();
        let gerund = token.transform(GrammaticalType::Gerund).unwrap();
        assert_eq!(gerund.text, "making impulse purchases");
        assert_eq!(gerund.grammatical_type, GrammaticalType::Gerund);
    }

    #[test]
    fn test_noun_cannot_become_gerund() {
        let token = PhraseToken::classify("relationships").unwrap();
        assert!(matches!(
            token.transform(GrammaticalType::Gerund),
            Err(GrammarError::Untransformable { .. })
        ));
    }

    #[test]
    fn test_fallback_on_failure() {
        let requirements = PhraseRequirements::default().with_fallback("steady effort");
        let phrase = safe_phrase("career", "Avoid {phrase} when tired", &requirements);
        assert_eq!(phrase, "steady effort");
    }

    #[test]
    fn test_too_long_phrase_falls_back() {
        let phrase = safe_phrase(
            "review every single priority on the entire list today",
            "Try to {phrase}.",
            &PhraseRequirements::default(),
        );
        assert_eq!(phrase, DEFAULT_FALLBACK);
    }

    #[test]
    fn test_inferred_contexts() {
        assert_eq!(infer_expected("Avoid {phrase} when tired."), Some(GrammaticalType::Gerund));
        assert_eq!(infer_expected("Hold back from {phrase}."), Some(GrammaticalType::Gerund));
        assert_eq!(infer_expected("Make time to {phrase}."), Some(GrammaticalType::VerbPhrase));
        assert_eq!(infer_expected("{phrase} before noon."), Some(GrammaticalType::VerbPhrase));
        assert_eq!(infer_expected("Protect your {phrase}."), Some(GrammaticalType::Noun));
        assert_eq!(infer_expected("Lean into {phrase}."), None);
    }

    #[test]
    fn test_noun_verb_as_noun() {
        let phrase = safe_phrase("Review", "Schedule a {phrase}.", &PhraseRequirements::default());
        assert_eq!(phrase, "review");
        let fallback = safe_phrase("sign contracts", "Schedule a {phrase}.", &PhraseRequirements::default());
        assert_eq!(fallback, DEFAULT_FALLBACK);
    }

    #[test]
    fn test_article_requirement() {
        let requirements = PhraseRequirements::expecting(GrammaticalType::AdjectiveNoun).with_article();
        assert_eq!(safe_phrase("honest conversation", "Start {phrase}.", &requirements), "an honest conversation");
    }
}
