//! # Horoscope Core
//!
//! The narrative engine. This crate takes scored transit events from
//! `astro_rules`, decides what each one means and where it matters, and
//! assembles readable, safe, non-repetitive horoscope prose.
//!
//! ## Core Components
//!
//! - **archetype**: Weighted multi-rule voting for archetype, tone and intensity
//! - **areas**: Per-area relevance ranking with donor-area borrowing
//! - **variation**: Seeded weighted template selection with a recency buffer
//! - **phrasebank**: Template assets, placeholder rendering and word pools
//! - **grammar**: Phrase classification and transforms for template slots
//! - **guardrails**: Banned terms, sentence caps, de-duplication, disclaimers
//! - **assembler**: Paragraphs, bullets and the generator prompt contract
//! - **caution**: Per-date severity digests
//! - **pipeline**: Raw events in, [`ForecastNarrative`] out
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Every random choice is seeded from event identity
//! - **Never stuck**: Missing templates, bad phrases and failed generators degrade to generic prose
//! - **Read-only tables**: Rules, templates and configuration are shared, per-request state is owned

pub mod archetype;
pub mod areas;
pub mod assembler;
pub mod caution;
pub mod error;
pub mod evidence;
pub mod grammar;
pub mod guardrails;
pub mod microcopy;
pub mod phrasebank;
pub mod pipeline;
pub mod polish;
pub mod variation;

pub use archetype::*;
pub use areas::*;
pub use assembler::*;
pub use caution::*;
pub use error::*;
pub use evidence::*;
pub use grammar::*;
pub use guardrails::*;
pub use phrasebank::*;
pub use pipeline::*;
pub use variation::*;
