//! Template Library - indexed store of template assets.

use astro_rules::{Area, Slot, Tone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{generic_sentence, placeholders, standard_assets, TemplateAsset, TemplateKey, KNOWN_PLACEHOLDERS};
use crate::error::LibraryError;
use crate::guardrails::Guardrails;

/// Where a lookup ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// An asset, possibly reached through the fallback chain.
    Asset(&'a TemplateAsset),
    /// Nothing in the chain matched.
    Generic(String),
}

/// Problem found while linting a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LintIssue {
    EmptyVariant { asset: String },
    UnknownPlaceholder { asset: String, placeholder: String },
    BannedPhrasing { asset: String, term: String },
    MissingCoverage { key: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LibraryDocument {
    Wrapped { assets: Vec<TemplateAsset> },
    Bare(Vec<TemplateAsset>),
}

/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    assets: BTreeMap<TemplateKey, TemplateAsset>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in template set.
    pub fn standard() -> Self {
        let mut library = Self::new();
        for asset in standard_assets() {
            library.add_asset(asset);
        }
        library
    }

    /// Load a library from JSON: either `{"assets": [...]}` or a bare array.
    pub fn from_json_str(json: &str) -> Result<Self, LibraryError> {
        let assets = match serde_json::from_str(json)? {
            LibraryDocument::Wrapped { assets } | LibraryDocument::Bare(assets) => assets,
        };
        let mut library = Self::new();
        for asset in assets {
            asset.validate()?;
            library.add_asset(asset);
        }
        Ok(library)
    }

    /// Add an asset. Variants merge into an existing asset with the same key.
    pub fn add_asset(&mut self, asset: TemplateAsset) {
        match self.assets.get_mut(&asset.key()) {
            Some(existing) => {
                existing.variants.extend(asset.variants);
                if asset.phrase_requirements.is_some() {
                    existing.phrase_requirements = asset.phrase_requirements;
                }
            }
            None => {
                self.assets.insert(asset.key(), asset);
            }
        }
    }

    pub fn with_asset(mut self, asset: TemplateAsset) -> Self {
        self.add_asset(asset);
        self
    }

    pub fn get(&self, key: &TemplateKey) -> Option<&TemplateAsset> {
        self.assets.get(key)
    }

    pub fn assets(&self) -> impl Iterator<Item = &TemplateAsset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Keys tried for a lookup, most specific first.
    pub fn fallback_chain(area: Area, tone: Tone, slot: Slot) -> [TemplateKey; 4] {
        [
            TemplateKey::new(area, tone, slot),
            TemplateKey::new(area, Tone::Neutral, slot),
            TemplateKey::new(Area::General, tone, slot),
            TemplateKey::new(Area::General, Tone::Neutral, slot),
        ]
    }

    /// Walk the fallback chain; never fails.
    pub fn resolve(&self, area: Area, tone: Tone, slot: Slot) -> Resolved<'_> {
        let requested = TemplateKey::new(area, tone, slot);
        for key in Self::fallback_chain(area, tone, slot) {
            if let Some(asset) = self.assets.get(&key).filter(|a| !a.variants.is_empty()) {
                if key != requested {
                    debug!(%requested, resolved = %key, "template fell back");
                }
                return Resolved::Asset(asset);
            }
        }
        debug!(%requested, "no template asset, using generic sentence");
        Resolved::Generic(generic_sentence(area, tone, slot))
    }

    /// Editorial check of every asset against the guardrails and coverage rules.
    pub fn lint(&self, guardrails: &Guardrails) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        for asset in self.assets.values() {
            for variant in &asset.variants {
                if variant.text.trim().is_empty() {
                    issues.push(LintIssue::EmptyVariant {
                        asset: asset.name.clone(),
                    });
                    continue;
                }
                for placeholder in placeholders(&variant.text) {
                    if !KNOWN_PLACEHOLDERS.contains(&placeholder.as_str()) {
                        issues.push(LintIssue::UnknownPlaceholder {
                            asset: asset.name.clone(),
                            placeholder,
                        });
                    }
                }
                for term in guardrails.violations(&variant.text, asset.area) {
                    issues.push(LintIssue::BannedPhrasing {
                        asset: asset.name.clone(),
                        term,
                    });
                }
            }
        }

        let mut required: Vec<(Area, Tone, Slot)> = Vec::new();
        for area in Area::ALL {
            for tone in Tone::ALL {
                for slot in [Slot::Opener, Slot::Coaching, Slot::Closer] {
                    required.push((area, tone, slot));
                }
            }
        }
        for tone in Tone::ALL {
            required.push((Area::General, tone, Slot::Bullet));
        }
        for (area, tone, slot) in required {
            if matches!(self.resolve(area, tone, slot), Resolved::Generic(_)) {
                issues.push(LintIssue::MissingCoverage {
                    key: TemplateKey::new(area, tone, slot).to_string(),
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_resolves() {
        let library = TemplateLibrary::standard();
        match library.resolve(Area::Career, Tone::Support, Slot::Opener) {
            Resolved::Asset(asset) => assert_eq!(asset.key(), TemplateKey::new(Area::Career, Tone::Support, Slot::Opener)),
            Resolved::Generic(_) => panic!("expected an asset"),
        }
    }

    #[test]
    fn test_fallback_chain_order() {
        let library = TemplateLibrary::new()
            .with_asset(TemplateAsset::new("love-neutral", Area::Love, Tone::Neutral, Slot::Closer).with_variant("A."))
            .with_asset(TemplateAsset::new("general-challenge", Area::General, Tone::Challenge, Slot::Closer).with_variant("B."));

        let resolved = library.resolve(Area::Love, Tone::Challenge, Slot::Closer);
        assert!(matches!(resolved, Resolved::Asset(a) if a.name == "love-neutral"));

        let resolved = library.resolve(Area::Career, Tone::Challenge, Slot::Closer);
        assert!(matches!(resolved, Resolved::Asset(a) if a.name == "general-challenge"));

        let resolved = library.resolve(Area::Career, Tone::Support, Slot::Opener);
        assert!(matches!(resolved, Resolved::Generic(text) if !text.is_empty()));
    }

    #[test]
    fn test_same_key_merges_variants() {
        let library = TemplateLibrary::new()
            .with_asset(TemplateAsset::new("a", Area::Health, Tone::Support, Slot::Closer).with_variant("One."))
            .with_asset(TemplateAsset::new("b", Area::Health, Tone::Support, Slot::Closer).with_variant("Two."));
        assert_eq!(library.len(), 1);
        let key = TemplateKey::new(Area::Health, Tone::Support, Slot::Closer);
        assert_eq!(library.get(&key).unwrap().variants.len(), 2);
    }

    #[test]
    fn test_from_json_both_shapes() {
        let wrapped = r#"{"assets": [{"name": "x", "area": "career", "tone": "support", "slot": "opener",
            "variants": [{"text": "Go {focus}.", "weight": 2.0}]}]}"#;
        let bare = r#"[{"name": "y", "area": "love", "tone": "neutral", "slot": "closer",
            "variants": [{"text": "Rest."}],
            "phrase_requirements": {"expected": "gerund", "fallback": "resting"}}]"#;

        assert_eq!(TemplateLibrary::from_json_str(wrapped).unwrap().len(), 1);
        let library = TemplateLibrary::from_json_str(bare).unwrap();
        let asset = library.assets().next().unwrap();
        assert_eq!(asset.requirements().fallback, "resting");
    }

    #[test]
    fn test_from_json_rejects_invalid_assets() {
        let empty = r#"[{"name": "z", "area": "love", "tone": "neutral", "slot": "closer", "variants": []}]"#;
        assert!(matches!(TemplateLibrary::from_json_str(empty), Err(LibraryError::EmptyAsset(_))));
        assert!(matches!(TemplateLibrary::from_json_str("not json"), Err(LibraryError::Parse(_))));
    }

    #[test]
    fn test_standard_library_lints_clean() {
        let issues = TemplateLibrary::standard().lint(&Guardrails::with_defaults());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn test_lint_reports_problems() {
        let library = TemplateLibrary::new().with_asset(
            TemplateAsset::new("bad", Area::Finance, Tone::Support, Slot::Opener)
                .with_variant("A guaranteed return awaits {planet}.")
                .with_variant("  "),
        );
        let issues = library.lint(&Guardrails::with_defaults());

        assert!(issues.contains(&LintIssue::UnknownPlaceholder {
            asset: "bad".into(),
            placeholder: "planet".into()
        }));
        assert!(issues.iter().any(|i| matches!(i, LintIssue::BannedPhrasing { term, .. } if term == "guaranteed")));
        assert!(issues.iter().any(|i| matches!(i, LintIssue::EmptyVariant { .. })));
        assert!(issues.iter().any(|i| matches!(i, LintIssue::MissingCoverage { .. })));
    }
}
