//! Error types for the narrative engine.

use astro_rules::ConfigError;
use thiserror::Error;

use crate::grammar::GrammaticalType;

/// A phrase could not be reshaped for its template slot.
///
/// Never surfaces past the phrasebank: callers substitute the slot's fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("phrase is empty")]
    Empty,

    #[error("cannot turn {found:?} phrase `{text}` into {expected:?}")]
    Untransformable {
        text: String,
        found: GrammaticalType,
        expected: GrammaticalType,
    },

    #[error("phrase `{text}` is longer than {max} words")]
    TooLong { text: String, max: usize },
}

/// Problems loading a template library.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to parse template library: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("template asset `{0}` has no variants")]
    EmptyAsset(String),

    #[error("template asset `{asset}` has a variant with non-positive weight {weight}")]
    InvalidWeight { asset: String, weight: f64 },
}

/// Failure reported by an external text generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator returned no text")]
    Empty,
}

/// The only errors the pipeline surfaces to callers.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("all {rejected} events in the batch were rejected")]
    NoEventsToNarrate { rejected: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

pub type NarrationResult<T> = Result<T, NarrationError>;
