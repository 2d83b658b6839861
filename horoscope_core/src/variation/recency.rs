//! Recency buffer for anti-repetition.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Recently used variants per selection key.
///
/// Owned by one request; pass it `&mut` through every selection so
/// consecutive picks for the same key avoid each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationState {
    window: usize,
    recent: BTreeMap<String, VecDeque<String>>,
}

impl VariationState {
    /// Remember up to `window` picks per key. A zero window is raised to one.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            recent: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(astro_rules::VariationConfig::default().recency_window)
    }

    /// Picks remembered per key.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Was `text` picked for `key` within the window.
    pub fn is_recent(&self, key: &str, text: &str) -> bool {
        self.recent
            .get(key)
            .is_some_and(|buffer| buffer.iter().any(|t| t == text))
    }

    /// Remember `text` for `key`, forgetting the oldest entry past the window.
    pub fn record(&mut self, key: &str, text: &str) {
        let buffer = self.recent.entry(key.to_string()).or_default();
        buffer.retain(|t| t != text);
        buffer.push_back(text.to_string());
        while buffer.len() > self.window {
            buffer.pop_front();
        }
    }
}

impl Default for VariationState {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_forgets_oldest() {
        let mut state = VariationState::new(2);
        state.record("k", "a");
        state.record("k", "b");
        state.record("k", "c");
        assert!(!state.is_recent("k", "a"));
        assert!(state.is_recent("k", "b"));
        assert!(state.is_recent("k", "c"));
        assert!(!state.is_recent("other", "c"));
    }

    #[test]
    fn test_rerecord_moves_to_back() {
        let mut state = VariationState::new(2);
        state.record("k", "a");
        state.record("k", "b");
        state.record("k", "a");
        state.record("k", "c");
        assert!(state.is_recent("k", "a"));
        assert!(!state.is_recent("k", "b"));
    }
}
