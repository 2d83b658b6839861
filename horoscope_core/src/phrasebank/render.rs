//! Placeholder substitution for template variants.
//!
//! Supported placeholders are `{descriptor}`, `{focus}` and `{phrase}`, each
//! optionally written `{a:name}` to insert the value with its indefinite
//! article. `{phrase}` goes through phrase safety first.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::grammar::{safe_phrase, with_article, PhraseRequirements};

/// Placeholder names templates may use.
pub const KNOWN_PLACEHOLDERS: &[&str] = &["descriptor", "focus", "phrase"];

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{(a:)?([A-Za-z_]+)\}").ok());

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderValues {
    pub descriptor: String,
    pub focus: String,
    pub phrase: Option<String>,
}

impl RenderValues {
    pub fn new(descriptor: impl Into<String>, focus: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            focus: focus.into(),
            phrase: None,
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }
}

/// Placeholder names used in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(template)
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_string()))
        .collect()
}

/// Fill every placeholder in `template`. Unknown placeholders render empty.
pub fn render(template: &str, values: &RenderValues, requirements: &PhraseRequirements) -> String {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };

    re.replace_all(template, |caps: &Captures| {
        let with_article_prefix = caps.get(1).is_some();
        let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        let value = match name {
            "descriptor" => values.descriptor.clone(),
            "focus" => values.focus.clone(),
            "phrase" => {
                let raw = values.phrase.as_deref().unwrap_or(&requirements.fallback);
                safe_phrase(raw, template, requirements)
            }
            _ => String::new(),
        };

        if with_article_prefix && !value.is_empty() {
            with_article(&value)
        } else {
            value
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_placeholders() {
        let values = RenderValues::new("steady", "work priorities").with_phrase("review priorities");
        let text = render(
            "A {descriptor} stretch for {focus}. Make time to {phrase}.",
            &values,
            &PhraseRequirements::default(),
        );
        assert_eq!(text, "A steady stretch for work priorities. Make time to review priorities.");
    }

    #[test]
    fn test_article_placeholder() {
        let values = RenderValues::new("exacting", "shared plans");
        let text = render("Expect {a:descriptor} week.", &values, &PhraseRequirements::default());
        assert_eq!(text, "Expect an exacting week.");
    }

    #[test]
    fn test_phrase_follows_template_context() {
        let values = RenderValues::default().with_phrase("focus");
        let text = render("Focus on {phrase}", &values, &PhraseRequirements::default());
        assert_eq!(text, "Focus on focusing");
    }

    #[test]
    fn test_missing_phrase_uses_fallback() {
        let text = render("Lean into {phrase}.", &RenderValues::default(), &PhraseRequirements::default());
        assert_eq!(text, "Lean into focused progress.");
    }

    #[test]
    fn test_unknown_placeholder_renders_empty() {
        let text = render("Hello {planet}.", &RenderValues::default(), &PhraseRequirements::default());
        assert_eq!(text, "Hello .");
        assert_eq!(placeholders("{a:focus} and {planet}"), vec!["focus", "planet"]);
    }
}
