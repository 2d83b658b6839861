//! Severity/polarity scorer.
//!
//! `score = sign(base) * |base| * planet_weight * closeness * scale`
//!
//! The sign always comes from the aspect's base weight: supportive aspects are
//! negative, challenging ones positive. Magnitude grows as the orb tightens and
//! as the transiting body gets heavier.

use crate::config::ScoringConfig;
use crate::events::Event;
use crate::mechanics::{Aspect, Body};

/// Smallest non-zero magnitude after rounding to two decimals.
const MIN_MAGNITUDE: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Closeness mapped onto `[min_closeness, 1]`.
    ///
    /// Orbs past the limit (or non-finite orbs) are treated as the boundary.
    pub fn closeness(&self, orb: f64, orb_limit: f64) -> f64 {
        let floor = self.config.min_closeness;
        if !orb_limit.is_finite() || orb_limit <= 0.0 || !orb.is_finite() {
            return floor;
        }
        let linear = 1.0 - orb.abs().min(orb_limit) / orb_limit;
        floor + (1.0 - floor) * linear
    }

    /// Unrounded score.
    pub fn raw_score(&self, aspect: Aspect, orb: f64, orb_limit: f64, transiting: &Body) -> f64 {
        let base = self.config.aspect_weight(aspect);
        let planet = self.config.planet_weight(transiting);
        base.signum() * base.abs() * planet * self.closeness(orb, orb_limit) * self.config.scale
    }

    /// Score rounded to two decimals. Never rounds a signed score to zero.
    pub fn score(&self, aspect: Aspect, orb: f64, orb_limit: f64, transiting: &Body) -> f64 {
        round_signed(self.raw_score(aspect, orb, orb_limit, transiting))
    }

    /// Score by aspect name; unknown aspects get a challenging base weight of 1.
    pub fn score_named(&self, aspect: &str, orb: f64, orb_limit: f64, transiting: &Body) -> f64 {
        match Aspect::parse(aspect) {
            Some(aspect) => self.score(aspect, orb, orb_limit, transiting),
            None => {
                let planet = self.config.planet_weight(transiting);
                round_signed(planet * self.closeness(orb, orb_limit) * self.config.scale)
            }
        }
    }

    /// Return the event with its score filled in.
    pub fn apply(&self, event: Event) -> Event {
        let score = self.score(event.aspect, event.orb, event.orb_limit, &event.transit_body);
        event.with_score(score)
    }

    /// Largest magnitude this transiting body can reach with this aspect.
    pub fn max_magnitude(&self, aspect: Aspect, transiting: &Body) -> f64 {
        self.raw_score(aspect, 0.0, 1.0, transiting).abs()
    }
}

fn round_signed(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 && value != 0.0 {
        MIN_MAGNITUDE.copysign(value)
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supportive_aspects_score_negative() {
        let scorer = Scorer::default();
        assert!(scorer.score(Aspect::Trine, 2.0, 6.0, &Body::Jupiter) < 0.0);
        assert!(scorer.score(Aspect::Sextile, 3.9, 4.0, &Body::Moon) < 0.0);
    }

    #[test]
    fn test_challenging_aspects_score_positive() {
        let scorer = Scorer::default();
        assert!(scorer.score(Aspect::Square, 2.0, 6.0, &Body::Saturn) > 0.0);
        assert!(scorer.score(Aspect::Opposition, 7.9, 8.0, &Body::Moon) > 0.0);
    }

    #[test]
    fn test_boundary_orb_is_not_zero() {
        let scorer = Scorer::default();
        let at_edge = scorer.score(Aspect::Trine, 6.0, 6.0, &Body::Sun);
        assert!(at_edge < 0.0);
        let past_edge = scorer.score(Aspect::Square, 9.0, 6.0, &Body::Sun);
        assert!(past_edge > 0.0);
    }

    #[test]
    fn test_mars_trine_chiron_tight_orb() {
        let scorer = Scorer::default();
        let score = scorer.score(Aspect::Trine, 0.03, 6.0, &Body::Mars);
        let max = scorer.max_magnitude(Aspect::Trine, &Body::Mars);
        assert!(score < 0.0);
        assert!(score.abs() > max * 0.98);
    }

    #[test]
    fn test_saturn_square_venus() {
        let scorer = Scorer::default();
        let score = scorer.score(Aspect::Square, 1.0, 6.0, &Body::Saturn);
        assert!((score - 35.7).abs() < 0.01);
    }

    #[test]
    fn test_heavier_planet_scores_larger() {
        let scorer = Scorer::default();
        let saturn = scorer.score(Aspect::Square, 1.0, 6.0, &Body::Saturn);
        let moon = scorer.score(Aspect::Square, 1.0, 6.0, &Body::Moon);
        assert!(saturn > moon);
    }

    #[test]
    fn test_unknown_body_gets_default_weight() {
        let scorer = Scorer::default();
        let eris = scorer.score(Aspect::Square, 1.0, 6.0, &Body::parse("Eris"));
        let sun = scorer.score(Aspect::Square, 1.0, 6.0, &Body::Sun);
        assert!((eris - sun).abs() < 0.001);
    }

    #[test]
    fn test_score_named_unknown_aspect() {
        let scorer = Scorer::default();
        assert!(scorer.score_named("novile", 0.5, 2.0, &Body::Sun) > 0.0);
        assert!(scorer.score_named("Trine", 0.5, 6.0, &Body::Sun) < 0.0);
    }

    #[test]
    fn test_tiny_scores_keep_sign() {
        assert!((round_signed(-0.001) + 0.01).abs() < 1e-9);
        assert!((round_signed(0.004) - 0.01).abs() < 1e-9);
        assert_eq!(round_signed(0.0), 0.0);
    }
}
