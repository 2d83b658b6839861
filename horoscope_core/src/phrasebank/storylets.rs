//! Storylet pools - editorial opener, coaching and closer lines grouped by
//! area, section and tone.
//!
//! A storylet document looks like
//! `{"storylets": {"career": {"openers": {"support": ["..."]}, "closers": ["..."]}}}`.
//! A section either maps tones to lines or is a flat list, which counts as
//! neutral. The `default` area feeds the general pools. Blank lines and
//! non-text entries are ignored.

use astro_rules::{Area, Slot, Tone};
use serde_json::Value;
use tracing::debug;

use super::{TemplateAsset, TemplateLibrary};
use crate::error::LibraryError;

/// Lines for one `(area, tone, slot)` pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryletPool {
    pub area: Area,
    pub tone: Tone,
    pub slot: Slot,
    pub lines: Vec<String>,
}

impl StoryletPool {
    /// One unweighted variant per line.
    pub fn into_asset(self) -> TemplateAsset {
        let name = format!("storylet/{}/{}/{}", self.area, self.tone, self.slot.as_str());
        TemplateAsset::new(name, self.area, self.tone, self.slot).with_variants(self.lines)
    }
}

/// Parse a storylet document into pools.
pub fn parse_storylets(json: &str) -> Result<Vec<StoryletPool>, LibraryError> {
    let document: Value = serde_json::from_str(json)?;
    let root = document.get("storylets").unwrap_or(&document);
    let Some(areas) = root.as_object() else {
        return Ok(Vec::new());
    };

    let mut pools = Vec::new();
    for (area_name, sections) in areas {
        let Some(area) = storylet_area(area_name) else {
            debug!(area = %area_name, "skipping storylets for unknown area");
            continue;
        };
        let Some(sections) = sections.as_object() else {
            continue;
        };
        for (section, options) in sections {
            let Some(slot) = Slot::parse(section) else {
                debug!(area = %area_name, section = %section, "skipping unknown storylet section");
                continue;
            };
            match options {
                Value::Object(by_tone) => {
                    for (tone_name, lines) in by_tone {
                        match Tone::parse(tone_name) {
                            Some(tone) => push_pool(&mut pools, area, tone, slot, lines),
                            None => debug!(tone = %tone_name, "skipping storylets for unknown tone"),
                        }
                    }
                }
                Value::Array(_) => push_pool(&mut pools, area, Tone::Neutral, slot, options),
                _ => {}
            }
        }
    }
    Ok(pools)
}

fn storylet_area(name: &str) -> Option<Area> {
    if name.trim().eq_ignore_ascii_case("default") {
        return Some(Area::General);
    }
    Area::parse(name)
}

fn push_pool(pools: &mut Vec<StoryletPool>, area: Area, tone: Tone, slot: Slot, lines: &Value) {
    let lines: Vec<String> = lines
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|line| match line {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();
    if !lines.is_empty() {
        pools.push(StoryletPool {
            area,
            tone,
            slot,
            lines,
        });
    }
}

impl TemplateLibrary {
    /// A library holding only the pools of a storylet document.
    pub fn from_storylets_json(json: &str) -> Result<Self, LibraryError> {
        Self::new().with_storylets_json(json)
    }

    /// Merge storylet pools in. Lines join any asset already stored under the same key.
    pub fn with_storylets_json(mut self, json: &str) -> Result<Self, LibraryError> {
        for pool in parse_storylets(json)? {
            self.add_asset(pool.into_asset());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrasebank::{Resolved, TemplateKey};
    use crate::variation::{VariationEngine, VariationState};
    use std::sync::Arc;

    const DOC: &str = r#"{
        "storylets": {
            "career": {
                "openers": {
                    "support": ["Your {focus} has a {descriptor} tailwind.", "  ", 7],
                    "sideways": ["ignored"]
                },
                "closers": ["Finish one thing before lunch.", null],
                "intro": ["ignored"]
            },
            "default": {
                "openers": {"neutral": ["The day opens evenly.", "Start where you are."]}
            },
            "astral": {"openers": ["ignored"]}
        }
    }"#;

    #[test]
    fn test_parse_normalizes_sections() {
        let pools = parse_storylets(DOC).unwrap();
        assert_eq!(pools.len(), 3);

        let opener = pools
            .iter()
            .find(|p| p.area == Area::Career && p.slot == Slot::Opener)
            .unwrap();
        assert_eq!(opener.tone, Tone::Support);
        assert_eq!(opener.lines, vec!["Your {focus} has a {descriptor} tailwind.", "7"]);

        let closer = pools.iter().find(|p| p.slot == Slot::Closer).unwrap();
        assert_eq!(closer.tone, Tone::Neutral);
        assert_eq!(closer.lines, vec!["Finish one thing before lunch."]);

        assert!(pools.iter().any(|p| p.area == Area::General && p.lines.len() == 2));
    }

    #[test]
    fn test_bare_document_is_accepted() {
        let pools = parse_storylets(r#"{"love": {"coaching": ["Ask one open question."]}}"#).unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].slot, Slot::Coaching);
    }

    #[test]
    fn test_missing_pool_walks_the_fallback_chain() {
        let library = TemplateLibrary::from_storylets_json(DOC).unwrap();
        match library.resolve(Area::Career, Tone::Challenge, Slot::Opener) {
            Resolved::Asset(asset) => {
                assert_eq!(asset.key(), TemplateKey::new(Area::General, Tone::Neutral, Slot::Opener))
            }
            Resolved::Generic(text) => panic!("expected the default pool, got {text}"),
        }
    }

    #[test]
    fn test_storylets_follow_recency_rules() {
        let library = TemplateLibrary::from_storylets_json(DOC).unwrap();
        let engine = VariationEngine::new(Arc::new(library));
        let mut state = VariationState::new(4);

        let first = engine.select_fragment(&mut state, Area::General, Tone::Neutral, Slot::Opener, 11);
        let second = engine.select_fragment(&mut state, Area::General, Tone::Neutral, Slot::Opener, 11);
        assert_ne!(first.text, second.text);

        let third = engine.select_fragment(&mut state, Area::General, Tone::Neutral, Slot::Opener, 11);
        assert!(third.text == first.text || third.text == second.text);
    }

    #[test]
    fn test_merge_extends_standard_pools() {
        let key = TemplateKey::new(Area::Career, Tone::Support, Slot::Opener);
        let before = TemplateLibrary::standard().get(&key).map_or(0, |a| a.variants.len());
        let merged = TemplateLibrary::standard().with_storylets_json(DOC).unwrap();
        assert_eq!(merged.get(&key).unwrap().variants.len(), before + 2);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(
            TemplateLibrary::from_storylets_json("{not json"),
            Err(LibraryError::Parse(_))
        ));
    }
}
