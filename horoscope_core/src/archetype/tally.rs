//! Vote tallies for weighted routing.

use serde::{Deserialize, Serialize};

/// Accumulates weighted votes per key, remembering the order keys first
/// received a vote. Ties are always broken in favour of the earliest key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteTally<K> {
    votes: Vec<(K, f32)>,
}

impl<K> Default for VoteTally<K> {
    fn default() -> Self {
        Self { votes: Vec::new() }
    }
}

impl<K: PartialEq + Clone> VoteTally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add weight to a key (accumulates with existing votes).
    pub fn add_vote(&mut self, key: K, weight: f32) {
        match self.votes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += weight,
            None => self.votes.push((key, weight)),
        }
    }

    pub fn get(&self, key: &K) -> f32 {
        self.votes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// The key with the highest total; earliest key wins ties.
    pub fn winner(&self) -> Option<(&K, f32)> {
        let mut best: Option<(&K, f32)> = None;
        for (key, weight) in &self.votes {
            match best {
                Some((_, top)) if *weight <= top => {}
                _ => best = Some((key, *weight)),
            }
        }
        best
    }

    /// All keys sorted by total (descending), first-seen order among equals.
    pub fn ranked(&self) -> Vec<(&K, f32)> {
        let mut ranked: Vec<_> = self.votes.iter().map(|(k, w)| (k, *w)).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
