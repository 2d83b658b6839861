//! Error types for event validation and configuration loading.

use thiserror::Error;

/// Why a single upstream event could not be turned into an [`Event`](crate::Event).
///
/// These are per-event problems: the batch keeps going without the event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("event is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unparsable event date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("unknown aspect `{0}`")]
    UnknownAspect(String),

    #[error("orb must be a finite, non-negative number of degrees, got {0}")]
    InvalidOrb(f64),

    #[error("orb limit must be a finite, positive number of degrees, got {0}")]
    InvalidOrbLimit(f64),

    #[error("natal house must be between 1 and 12, got {0}")]
    InvalidHouse(i64),
}

/// Problems found while building a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("aspect `{aspect}` has base weight {weight} with the wrong sign for its polarity")]
    AspectSign { aspect: String, weight: f64 },

    #[error("planet weight for `{body}` must be finite and positive, got {weight}")]
    PlanetWeight { body: String, weight: f64 },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
