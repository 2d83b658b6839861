//! # Astro Rules
//!
//! The rulebook crate: aspect and body vocabulary, the transit event model,
//! the severity/polarity scorer and pipeline configuration. It holds no
//! narrative logic; `horoscope_core` builds on it.

pub mod config;
pub mod error;
pub mod events;
pub mod mechanics;
pub mod scoring;

pub use config::*;
pub use error::*;
pub use events::*;
pub use mechanics::*;
pub use scoring::*;
