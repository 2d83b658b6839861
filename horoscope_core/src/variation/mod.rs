//! Variation Engine - seeded, weighted template selection with anti-repetition.
//!
//! A selection resolves `(area, tone, slot)` through the library's fallback
//! chain, drops variants used within the recency window (unless that would
//! leave nothing), and rolls a weighted choice with a ChaCha RNG seeded from
//! the caller's seed. The same seed and state always give the same pick.

mod recency;
mod seed;

pub use recency::*;
pub use seed::*;

use astro_rules::{Area, Slot, Tone};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::debug;

use crate::grammar::PhraseRequirements;
use crate::phrasebank::{Resolved, TemplateKey, TemplateLibrary};

/// A selected template fragment, not yet rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub requirements: PhraseRequirements,
    /// Key the fragment came from; `None` for the built-in generic sentence.
    pub resolved: Option<TemplateKey>,
    /// Tone of the resolved key, which may differ from the requested one after fallback.
    pub tone: Tone,
}

#[derive(Debug, Clone)]
pub struct VariationEngine {
    library: Arc<TemplateLibrary>,
}

impl VariationEngine {
    /// Engine over a shared template library.
    pub fn new(library: Arc<TemplateLibrary>) -> Self {
        Self { library }
    }

    pub fn with_defaults() -> Self {
        Self::new(Arc::new(TemplateLibrary::standard()))
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Choose one fragment for `(area, tone, slot)`. Never fails.
    pub fn select_fragment(
        &self,
        state: &mut VariationState,
        area: Area,
        tone: Tone,
        slot: Slot,
        seed: u64,
    ) -> Fragment {
        match self.library.resolve(area, tone, slot) {
            Resolved::Asset(asset) => {
                let key = asset.key();
                let options: Vec<(&str, f64)> = asset
                    .variants
                    .iter()
                    .map(|v| (v.text.as_str(), v.weight))
                    .collect();
                match choose_weighted(state, &key.as_string(), &options, seed) {
                    Some(text) => Fragment {
                        text,
                        requirements: asset.requirements(),
                        resolved: Some(key),
                        tone: key.tone,
                    },
                    None => generic_fragment(area, tone, slot),
                }
            }
            Resolved::Generic(text) => Fragment {
                text,
                requirements: PhraseRequirements::default(),
                resolved: None,
                tone,
            },
        }
    }

    /// Uniform pick from a word pool, with the same recency rules as fragments.
    pub fn pick(&self, state: &mut VariationState, key: &str, options: &[&str], seed: u64) -> Option<String> {
        let weighted: Vec<(&str, f64)> = options.iter().map(|o| (*o, 1.0)).collect();
        choose_weighted(state, key, &weighted, seed)
    }
}

impl Default for VariationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn generic_fragment(area: Area, tone: Tone, slot: Slot) -> Fragment {
    Fragment {
        text: crate::phrasebank::generic_sentence(area, tone, slot),
        requirements: PhraseRequirements::default(),
        resolved: None,
        tone,
    }
}

/// Weighted choice among options not used recently under `key`, then recorded.
///
/// When every option is recent the exclusion is lifted for this call.
/// Non-positive weights never win unless nothing else is left.
pub fn choose_weighted(
    state: &mut VariationState,
    key: &str,
    options: &[(&str, f64)],
    seed: u64,
) -> Option<String> {
    if options.is_empty() {
        return None;
    }

    let fresh: Vec<(&str, f64)> = options
        .iter()
        .filter(|(text, _)| !state.is_recent(key, text))
        .copied()
        .collect();
    let pool = if fresh.is_empty() {
        debug!(key, "recency window covers every option, lifting exclusion");
        options.to_vec()
    } else {
        fresh
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let weight = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = pool.iter().map(|(_, w)| weight(*w)).sum();

    let chosen = if total > 0.0 {
        let mut roll: f64 = rng.gen_range(0.0..total);
        let mut chosen = pool[pool.len() - 1].0;
        for (text, w) in &pool {
            let w = weight(*w);
            if w == 0.0 {
                continue;
            }
            roll -= w;
            if roll <= 0.0 {
                chosen = *text;
                break;
            }
        }
        chosen
    } else {
        pool[rng.gen_range(0..pool.len())].0
    };

    state.record(key, chosen);
    Some(chosen.to_string())
}
