//! Tags attached to classified events.

use astro_rules::{Polarity, Tone};
use serde::{Deserialize, Serialize};

/// Tags describe what a classified event is about and how it should sound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    /// A life theme (e.g. "career", "healing").
    Theme(String),

    /// The narrative tone chosen for the event.
    Tone(Tone),

    /// Polarity read from the score sign.
    Polarity(Polarity),

    /// The winning archetype.
    Archetype(String),
}

impl Tag {
    pub fn theme(name: impl Into<String>) -> Self {
        Tag::Theme(name.into())
    }

    pub fn archetype(name: impl Into<String>) -> Self {
        Tag::Archetype(name.into())
    }

    /// The theme name, if this is a theme tag.
    pub fn theme_name(&self) -> Option<&str> {
        match self {
            Tag::Theme(name) => Some(name),
            _ => None,
        }
    }

    /// Themes render bare; everything else is prefixed with its category.
    pub fn as_string(&self) -> String {
        match self {
            Tag::Theme(s) => s.clone(),
            Tag::Tone(tone) => format!("tone:{}", tone),
            Tag::Polarity(polarity) => format!("polarity:{:?}", polarity).to_ascii_lowercase(),
            Tag::Archetype(s) => format!("archetype:{}", s),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Append a tag unless it is already present, keeping first-seen order.
pub fn push_unique(tags: &mut Vec<Tag>, tag: Tag) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_as_string() {
        assert_eq!(Tag::theme("career").as_string(), "career");
        assert_eq!(Tag::Tone(Tone::Support).as_string(), "tone:support");
        assert_eq!(Tag::Polarity(Polarity::Challenging).as_string(), "polarity:challenging");
        assert_eq!(Tag::archetype("General Flow").as_string(), "archetype:General Flow");
    }

    #[test]
    fn test_theme_name() {
        assert_eq!(Tag::theme("healing").theme_name(), Some("healing"));
        assert_eq!(Tag::Tone(Tone::Neutral).theme_name(), None);
    }

    #[test]
    fn test_push_unique_keeps_order() {
        let mut tags = Vec::new();
        push_unique(&mut tags, Tag::theme("growth"));
        push_unique(&mut tags, Tag::theme("healing"));
        push_unique(&mut tags, Tag::theme("growth"));
        assert_eq!(tags, vec![Tag::theme("growth"), Tag::theme("healing")]);
    }
}
