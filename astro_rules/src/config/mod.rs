//! Pipeline configuration.
//!
//! Every section has sensible defaults, so an empty TOML document is a valid
//! configuration. Weight tables are checked at construction time: a supportive
//! aspect can never be configured with a positive weight.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConfigError, ConfigResult};
use crate::mechanics::{Aspect, Body, Intensity, Polarity};

/// Weights and constants for the severity/polarity scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Signed base weight overrides keyed by aspect name.
    pub aspect_weights: BTreeMap<String, f64>,
    /// Positive planet weight overrides keyed by body name (case-insensitive).
    pub planet_weights: BTreeMap<String, f64>,
    /// Weight for bodies the rulebook does not know.
    pub default_planet_weight: f64,
    /// Multiplier applied after weighting.
    pub scale: f64,
    /// Closeness an event keeps at the very edge of its orb.
    pub min_closeness: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            aspect_weights: BTreeMap::new(),
            planet_weights: BTreeMap::new(),
            default_planet_weight: 1.0,
            scale: 10.0,
            min_closeness: 0.1,
        }
    }
}

impl ScoringConfig {
    pub fn aspect_weight(&self, aspect: Aspect) -> f64 {
        self.aspect_weights
            .get(aspect.as_str())
            .copied()
            .unwrap_or_else(|| aspect.default_weight())
    }

    pub fn planet_weight(&self, body: &Body) -> f64 {
        let key = body.name().to_ascii_lowercase();
        if let Some(weight) = self
            .planet_weights
            .iter()
            .find(|(name, _)| name.to_ascii_lowercase() == key)
            .map(|(_, weight)| *weight)
        {
            return weight;
        }
        if body.is_known() {
            body.default_weight()
        } else {
            self.default_planet_weight
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, weight) in &self.aspect_weights {
            let aspect = Aspect::parse(name).ok_or_else(|| ConfigError::InvalidValue {
                field: "scoring.aspect_weights",
                reason: format!("unknown aspect `{name}`"),
            })?;
            let sign_ok = match aspect.polarity() {
                Polarity::Supportive => *weight < 0.0,
                _ => *weight > 0.0,
            };
            if !weight.is_finite() || !sign_ok {
                return Err(ConfigError::AspectSign {
                    aspect: name.clone(),
                    weight: *weight,
                });
            }
        }

        for (body, weight) in &self.planet_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(ConfigError::PlanetWeight {
                    body: body.clone(),
                    weight: *weight,
                });
            }
        }

        if !self.default_planet_weight.is_finite() || self.default_planet_weight <= 0.0 {
            return Err(ConfigError::PlanetWeight {
                body: "<default>".to_string(),
                weight: self.default_planet_weight,
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.scale",
                reason: format!("must be positive, got {}", self.scale),
            });
        }
        if !(self.min_closeness > 0.0 && self.min_closeness < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "scoring.min_closeness",
                reason: format!("must be inside (0, 1), got {}", self.min_closeness),
            });
        }
        Ok(())
    }
}

/// `|score|` thresholds at which each intensity level starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityThresholds {
    pub gentle: f64,
    pub momentum: f64,
    pub major: f64,
    pub strong: f64,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self {
            gentle: 5.0,
            momentum: 12.0,
            major: 20.0,
            strong: 30.0,
        }
    }
}

impl IntensityThresholds {
    pub fn level(&self, score: f64) -> Intensity {
        let magnitude = score.abs();
        if magnitude >= self.strong {
            Intensity::Strong
        } else if magnitude >= self.major {
            Intensity::Major
        } else if magnitude >= self.momentum {
            Intensity::Momentum
        } else if magnitude >= self.gentle {
            Intensity::Gentle
        } else {
            Intensity::Background
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let ordered = self.gentle > 0.0
            && self.gentle < self.momentum
            && self.momentum < self.major
            && self.major < self.strong;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "intensity",
                reason: "thresholds must be positive and strictly increasing".to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Scores with a smaller magnitude read as neutral.
    pub neutral_band: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { neutral_band: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Candidates kept per area (at least 2).
    pub top_k: usize,
    /// An area whose best relevance is below this borrows from a donor area.
    pub min_relevance: f64,
    /// Weight of relevance in the blended ranking score.
    pub relevance_weight: f64,
    /// Bonus per archetype tag shared with the area's themes.
    pub coherence_bonus: f64,
    /// Weight of the coherence bonus in the blended ranking score.
    pub coherence_weight: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_relevance: 1.0,
            relevance_weight: 25.0,
            coherence_bonus: 0.35,
            coherence_weight: 18.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariationConfig {
    /// How many recent picks per (area, tone, slot) are excluded from selection.
    pub recency_window: usize,
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self { recency_window: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    pub max_sentence_words: usize,
    /// How many preceding sentences a new sentence is compared against.
    pub dedupe_window: usize,
    /// Append area disclaimers (health, finance).
    pub disclaimers: bool,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            max_sentence_words: 28,
            dedupe_window: 3,
            disclaimers: true,
        }
    }
}

/// Complete configuration passed to the pipeline constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub scoring: ScoringConfig,
    pub intensity: IntensityThresholds,
    pub router: RouterConfig,
    pub selector: SelectorConfig,
    pub variation: VariationConfig,
    pub guardrails: GuardrailConfig,

    /// Include the coaching beat and supporting evidence in paragraphs.
    pub rich_templates: bool,
    /// Allow one canned driver hint per paragraph.
    pub driver_microcopy: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            intensity: IntensityThresholds::default(),
            router: RouterConfig::default(),
            selector: SelectorConfig::default(),
            variation: VariationConfig::default(),
            guardrails: GuardrailConfig::default(),
            rich_templates: true,
            driver_microcopy: true,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.scoring.validate()?;
        self.intensity.validate()?;

        if !self.router.neutral_band.is_finite() || self.router.neutral_band < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "router.neutral_band",
                reason: format!("must be non-negative, got {}", self.router.neutral_band),
            });
        }
        if self.selector.top_k < 2 {
            return Err(ConfigError::InvalidValue {
                field: "selector.top_k",
                reason: format!("must keep at least 2 candidates, got {}", self.selector.top_k),
            });
        }
        if self.variation.recency_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "variation.recency_window",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.guardrails.max_sentence_words < 6 {
            return Err(ConfigError::InvalidValue {
                field: "guardrails.max_sentence_words",
                reason: format!("too short to write a sentence: {}", self.guardrails.max_sentence_words),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = PipelineConfig::from_toml_str(
            r#"
            rich_templates = false

            [selector]
            top_k = 4

            [scoring.planet_weights]
            Chiron = 1.5
            "#,
        )
        .unwrap();

        assert!(!config.rich_templates);
        assert_eq!(config.selector.top_k, 4);
        assert!((config.selector.min_relevance - 1.0).abs() < 0.001);
        assert!((config.scoring.planet_weight(&Body::Chiron) - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_rejects_flipped_aspect_sign() {
        let result = PipelineConfig::from_toml_str(
            r#"
            [scoring.aspect_weights]
            trine = 1.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::AspectSign { .. })));

        let result = PipelineConfig::from_toml_str(
            r#"
            [scoring.aspect_weights]
            square = -1.4
            "#,
        );
        assert!(matches!(result, Err(ConfigError::AspectSign { .. })));
    }

    #[test]
    fn test_rejects_small_top_k() {
        let result = PipelineConfig::from_toml_str("[selector]\ntop_k = 1\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { field: "selector.top_k", .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            PipelineConfig::from_toml_str("rich_templates = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_intensity_levels() {
        let thresholds = IntensityThresholds::default();
        assert_eq!(thresholds.level(-2.0), Intensity::Background);
        assert_eq!(thresholds.level(-19.9), Intensity::Momentum);
        assert_eq!(thresholds.level(35.7), Intensity::Strong);
    }

    #[test]
    fn test_unknown_body_uses_default_planet_weight() {
        let scoring = ScoringConfig {
            default_planet_weight: 1.25,
            ..Default::default()
        };
        assert!((scoring.planet_weight(&Body::parse("Eris")) - 1.25).abs() < 0.001);
        assert!((scoring.planet_weight(&Body::Saturn) - 3.0).abs() < 0.001);
    }
}
