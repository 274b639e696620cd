//! Onsets as unit vectors on the rhythm circle: perfect balance and center
//! of gravity.

use crate::types::Pattern;
use std::f64::consts::PI;
use std::fmt;

/// Quality grade shared by the balance and center-of-gravity scales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Quality {
    Perfect,
    Excellent,
    Good,
    Fair,
    Poor,
    /// No onsets to measure
    Empty,
}

impl Quality {
    pub fn name(&self) -> &'static str {
        match self {
            Quality::Perfect => "perfect",
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Fair => "fair",
            Quality::Poor => "poor",
            Quality::Empty => "empty",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceAnalysis {
    /// Length of the summed onset vectors, in `[0, onset_count]`
    pub magnitude: f64,
    pub normalized_magnitude: f64,
    pub score: Quality,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CenterOfGravity {
    pub x: f64,
    pub y: f64,
    pub magnitude: f64,
    /// Direction of the skew in degrees, `0` when there is none
    pub angle_degrees: f64,
    pub score: Quality,
}

fn vector_sum(pattern: &Pattern, angle_offset: f64) -> (f64, f64) {
    let n = pattern.step_count() as f64;
    pattern.onsets().iter().fold((0.0, 0.0), |(x, y), &p| {
        let angle = 2.0 * PI * p as f64 / n + angle_offset;
        (x + angle.cos(), y + angle.sin())
    })
}

fn balance_score(magnitude: f64, normalized: f64) -> Quality {
    if magnitude < 0.001 {
        Quality::Perfect
    } else if normalized < 0.05 {
        Quality::Excellent
    } else if normalized < 0.15 {
        Quality::Good
    } else if normalized < 0.4 {
        Quality::Fair
    } else {
        Quality::Poor
    }
}

fn gravity_score(magnitude: f64) -> Quality {
    if magnitude < 0.05 {
        Quality::Excellent
    } else if magnitude < 0.15 {
        Quality::Good
    } else if magnitude < 0.4 {
        Quality::Fair
    } else {
        Quality::Poor
    }
}

pub fn balance(pattern: &Pattern) -> BalanceAnalysis {
    let onsets = pattern.onset_count();
    if onsets == 0 {
        return BalanceAnalysis {
            magnitude: 0.0,
            normalized_magnitude: 0.0,
            score: Quality::Empty,
        };
    }

    let (x, y) = vector_sum(pattern, 0.0);
    let magnitude = x.hypot(y);
    let normalized_magnitude = magnitude / onsets as f64;
    BalanceAnalysis {
        magnitude,
        normalized_magnitude,
        score: balance_score(magnitude, normalized_magnitude),
    }
}

/// Mean onset vector, with position 0 drawn at the top of the circle
pub fn center_of_gravity(pattern: &Pattern) -> CenterOfGravity {
    let onsets = pattern.onset_count();
    if onsets == 0 {
        return CenterOfGravity {
            x: 0.0,
            y: 0.0,
            magnitude: 0.0,
            angle_degrees: 0.0,
            score: Quality::Empty,
        };
    }

    let (sx, sy) = vector_sum(pattern, -PI / 2.0);
    let (x, y) = (sx / onsets as f64, sy / onsets as f64);
    let magnitude = x.hypot(y);
    let angle_degrees = if magnitude < 1e-9 {
        0.0
    } else {
        y.atan2(x).to_degrees()
    };
    CenterOfGravity {
        x,
        y,
        magnitude,
        angle_degrees,
        score: gravity_score(magnitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(bits: &str) -> Pattern {
        Pattern::from_binary(bits).unwrap()
    }

    #[test]
    fn test_regular_polygon_is_perfect() {
        let b = balance(&p("100100100"));
        assert!(b.magnitude < 0.001);
        assert_eq!(b.score, Quality::Perfect);
    }

    #[test]
    fn test_single_onset_is_poor() {
        let b = balance(&p("1000"));
        assert!((b.magnitude - 1.0).abs() < 1e-9);
        assert_eq!(b.score, Quality::Poor);
    }

    #[test]
    fn test_tresillo_balance() {
        let b = balance(&p("10010010"));
        // (1,0) + (-0.707,0.707) + (0,-1)
        assert!((b.magnitude - 0.4142).abs() < 1e-3);
        assert_eq!(b.score, Quality::Good);
    }

    #[test]
    fn test_empty_pattern() {
        let b = balance(&p("0000"));
        assert_eq!(b.magnitude, 0.0);
        assert_eq!(b.score, Quality::Empty);
        assert_eq!(center_of_gravity(&p("0000")).score, Quality::Empty);
    }

    #[test]
    fn test_gravity_points_at_lone_onset() {
        let c = center_of_gravity(&p("1000"));
        // position 0 sits at the top: angle -90 degrees
        assert!((c.magnitude - 1.0).abs() < 1e-9);
        assert!((c.angle_degrees + 90.0).abs() < 1e-9);
        assert_eq!(c.score, Quality::Poor);
    }

    #[test]
    fn test_opposite_onsets_cancel() {
        let c = center_of_gravity(&p("1010"));
        assert_eq!(c.score, Quality::Excellent);
        assert_eq!(c.angle_degrees, 0.0);
    }
}
