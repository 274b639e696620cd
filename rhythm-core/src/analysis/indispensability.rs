//! Barlow indispensability from a stratified meter decomposition.
//!
//! A cycle of `n` steps is split by its prime factors, smallest first: an
//! `n = 12` cycle is two halves, each half two quarters, and the whole cycle
//! three thirds. A position inherits weight `1/p^level` from every stratum
//! whose grid it sits on. Positions on no grid fall back to `gcd(pos, n)/n`.

use crate::number_theory::{gcd, prime_powers};
use std::cmp::Ordering;

/// Weight of one position of an `n`-step cycle.
///
/// Prime cycles have a single stratum of stride 1, so every position ties.
pub fn indispensability(position: usize, steps: usize) -> f64 {
    if steps == 0 {
        return 0.0;
    }
    let position = position % steps;

    let mut weight = 0.0;
    for (prime, multiplicity) in prime_powers(steps as u64) {
        let mut power = 1u64;
        for _ in 0..multiplicity {
            power *= prime;
            let stride = steps as u64 / power;
            if position as u64 % stride == 0 {
                weight += 1.0 / power as f64;
            }
        }
    }

    if weight > 0.0 {
        return weight;
    }

    tracing::trace!(position, steps, "indispensability fallback");
    gcd(position as i64, steps as i64) as f64 / steps as f64
}

/// Weights of every position
pub fn indispensability_profile(steps: usize) -> Vec<f64> {
    (0..steps).map(|p| indispensability(p, steps)).collect()
}

/// Weights scaled so the downbeat is `1.0`
pub fn normalized_profile(steps: usize) -> Vec<f64> {
    let profile = indispensability_profile(steps);
    match profile.first() {
        Some(&downbeat) if downbeat > 0.0 => profile.iter().map(|w| w / downbeat).collect(),
        _ => profile,
    }
}

/// Positions ordered from most to least indispensable; ties keep position
/// order
pub fn ranked_positions(steps: usize) -> Vec<usize> {
    let profile = indispensability_profile(steps);
    let mut positions: Vec<usize> = (0..steps).collect();
    positions.sort_by(|&a, &b| {
        profile[b]
            .partial_cmp(&profile[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_twelve_step_strata() {
        // halves (1/2), quarters (1/4), thirds (1/3)
        assert!(close(indispensability(0, 12), 0.5 + 0.25 + 1.0 / 3.0));
        assert!(close(indispensability(6, 12), 0.5 + 0.25));
        assert!(close(indispensability(3, 12), 0.25));
        assert!(close(indispensability(4, 12), 1.0 / 3.0));
        assert!(close(indispensability(8, 12), 1.0 / 3.0));
    }

    #[test]
    fn test_fallback_uses_gcd() {
        assert!(close(indispensability(1, 12), 1.0 / 12.0));
        assert!(close(indispensability(2, 12), 2.0 / 12.0));
        assert!(close(indispensability(10, 12), 2.0 / 12.0));
    }

    #[test]
    fn test_binary_meter_is_hierarchical() {
        let profile = indispensability_profile(8);
        // the half-bar sits on every binary stratum, like the downbeat
        assert!(close(profile[0], profile[4]));
        assert!(profile[4] > profile[2]);
        assert!(close(profile[2], profile[6]));
        assert!(profile[2] > profile[1]);
    }

    #[test]
    fn test_prime_cycle_is_flat() {
        let profile = indispensability_profile(7);
        assert!(profile.iter().all(|&w| close(w, 1.0 / 7.0)));
    }

    #[test]
    fn test_single_step() {
        assert!(close(indispensability(0, 1), 1.0));
    }

    #[test]
    fn test_normalized_downbeat_is_one() {
        for n in 1..=32 {
            let profile = normalized_profile(n);
            assert!(close(profile[0], 1.0), "n = {}", n);
            assert!(profile.iter().all(|&w| w <= 1.0 + 1e-9));
        }
    }

    #[test]
    fn test_ranking() {
        assert_eq!(ranked_positions(8), vec![0, 4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(ranked_positions(6)[..3], [0, 3, 2]);
    }
}
