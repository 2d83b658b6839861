//! Phrasebank - template assets, placeholder rendering and word pools.
//!
//! Assets are keyed by `(area, tone, slot)` and carry weighted variants. The
//! library resolves a key through a fixed fallback chain and ends in a generic
//! sentence, so lookups never fail. Storylet documents merge extra opener,
//! coaching and closer pools into the same keys.

mod asset;
mod defaults;
mod library;
mod render;
mod storylets;
mod vocabulary;

pub use asset::*;
pub use defaults::*;
pub use library::*;
pub use render::*;
pub use storylets::*;
pub use vocabulary::*;
