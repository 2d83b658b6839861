//! Transit motion helpers: distance from exactness and applying/separating phase.

use serde::{Deserialize, Serialize};

/// Whether a transit is building toward exactness or fading from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Applying,
    Separating,
}

impl Phase {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "applying" | "apply" => Some(Phase::Applying),
            "separating" | "separate" => Some(Phase::Separating),
            _ => None,
        }
    }

    /// Damping applied to a fading transit's contribution.
    pub fn multiplier(&self) -> f64 {
        match self {
            Phase::Applying => 1.0,
            Phase::Separating => 0.6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Applying => "applying",
            Phase::Separating => "separating",
        }
    }
}

/// Signed distance in degrees from the exact aspect, in `[-180, 180)`.
///
/// Positive means the transiting body has moved past exactness.
pub fn signed_delta(transit_lon: f64, natal_lon: f64, aspect_angle: f64) -> f64 {
    ((transit_lon - natal_lon) - aspect_angle + 540.0).rem_euclid(360.0) - 180.0
}

/// True while the separation is shrinking toward the exact aspect.
///
/// An exact hit counts as applying. Bodies moving at the same rate never converge.
pub fn is_applying(
    transit_lon: f64,
    transit_speed: f64,
    natal_lon: f64,
    natal_speed: f64,
    aspect_angle: f64,
) -> bool {
    let delta = signed_delta(transit_lon, natal_lon, aspect_angle);
    if delta.abs() < 1e-6 {
        return true;
    }

    let rate = transit_speed - natal_speed;
    if rate.abs() < 1e-6 {
        return false;
    }

    (delta > 0.0 && rate < 0.0) || (delta < 0.0 && rate > 0.0)
}

/// Phase of a transit from positions and daily speeds.
pub fn phase_of(
    transit_lon: f64,
    transit_speed: f64,
    natal_lon: f64,
    natal_speed: f64,
    aspect_angle: f64,
) -> Phase {
    if is_applying(transit_lon, transit_speed, natal_lon, natal_speed, aspect_angle) {
        Phase::Applying
    } else {
        Phase::Separating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_delta_wraps() {
        assert!((signed_delta(10.0, 350.0, 0.0) - 20.0).abs() < 1e-9);
        assert!((signed_delta(350.0, 10.0, 0.0) + 20.0).abs() < 1e-9);
        assert!((signed_delta(100.0, 10.0, 90.0)).abs() < 1e-9);
    }

    #[test]
    fn test_applying_when_closing_in() {
        // Transit two degrees short of a square and moving forward.
        assert!(is_applying(98.0, 1.0, 10.0, 0.0, 90.0));
        // Same position, retrograde: moving away.
        assert!(!is_applying(98.0, -1.0, 10.0, 0.0, 90.0));
    }

    #[test]
    fn test_exact_counts_as_applying() {
        assert_eq!(phase_of(100.0, 0.0, 10.0, 0.0, 90.0), Phase::Applying);
    }

    #[test]
    fn test_equal_speeds_do_not_converge() {
        assert_eq!(phase_of(95.0, 0.5, 10.0, 0.5, 90.0), Phase::Separating);
    }
}
