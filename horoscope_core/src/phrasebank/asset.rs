//! Template assets - weighted text variants for one (area, tone, slot).

use astro_rules::{Area, Slot, Tone};
use serde::{Deserialize, Serialize};

use crate::error::LibraryError;
use crate::grammar::PhraseRequirements;

/// Lookup key of a template asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateKey {
    pub area: Area,
    pub tone: Tone,
    pub slot: Slot,
}

impl TemplateKey {
    pub fn new(area: Area, tone: Tone, slot: Slot) -> Self {
        Self { area, tone, slot }
    }

    /// Name used for recency bookkeeping and log fields.
    pub fn as_string(&self) -> String {
        format!("{}/{}/{}", self.area, self.tone, self.slot.as_str())
    }
}

impl std::fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// One text variant with its selection weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Variant {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: 1.0,
        }
    }

    pub fn weighted(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// A named set of weighted variants for one (area, tone, slot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAsset {
    pub name: String,
    pub area: Area,
    pub tone: Tone,
    pub slot: Slot,
    pub variants: Vec<Variant>,

    /// How `{phrase}` must be shaped in these variants.
    #[serde(default)]
    pub phrase_requirements: Option<PhraseRequirements>,
}

impl TemplateAsset {
    pub fn new(name: impl Into<String>, area: Area, tone: Tone, slot: Slot) -> Self {
        Self {
            name: name.into(),
            area,
            tone,
            slot,
            variants: Vec::new(),
            phrase_requirements: None,
        }
    }

    pub fn with_variant(mut self, text: impl Into<String>) -> Self {
        self.variants.push(Variant::new(text));
        self
    }

    pub fn with_variants<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants.extend(texts.into_iter().map(Variant::new));
        self
    }

    pub fn with_weighted(mut self, text: impl Into<String>, weight: f64) -> Self {
        self.variants.push(Variant::weighted(text, weight));
        self
    }

    pub fn with_requirements(mut self, requirements: PhraseRequirements) -> Self {
        self.phrase_requirements = Some(requirements);
        self
    }

    pub fn key(&self) -> TemplateKey {
        TemplateKey::new(self.area, self.tone, self.slot)
    }

    /// Requirements for `{phrase}`, defaulting to context inference.
    pub fn requirements(&self) -> PhraseRequirements {
        self.phrase_requirements.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.variants.iter().all(|v| v.text.trim().is_empty()) {
            return Err(LibraryError::EmptyAsset(self.name.clone()));
        }
        if let Some(bad) = self
            .variants
            .iter()
            .find(|v| !v.weight.is_finite() || v.weight <= 0.0)
        {
            return Err(LibraryError::InvalidWeight {
                asset: self.name.clone(),
                weight: bad.weight,
            });
        }
        Ok(())
    }
}
