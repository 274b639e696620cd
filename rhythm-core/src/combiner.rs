//! LCM-based combination of patterns.
//!
//! Patterns of different lengths are laid on a common cycle of
//! `lcm(step counts)` steps and merged with a logical OR. Polygons are
//! re-derived from their vertex angles at the new length; everything else
//! keeps each onset's phase (`round(pos · len / n)`).

use crate::config::DEFAULT_MAX_STEPS;
use crate::error::{ParseError, Result};
use crate::generators::polygon_at;
use crate::number_theory::lcm_many;
use crate::types::{Origin, Pattern};
use num_rational::Ratio;

/// Lay `pattern` on a cycle of `len` steps, keeping onset phases
pub fn extend_to(pattern: &Pattern, len: usize) -> Result<Pattern> {
    if len == 0 {
        return Err(ParseError::invalid_parameter("extension length", 0));
    }
    if len == pattern.step_count() {
        return Ok(pattern.clone());
    }

    if let Origin::Polygon {
        vertices,
        offset,
        expansion,
    } = pattern.origin()
    {
        return polygon_at(*vertices, *offset, *expansion, len);
    }

    let n = pattern.step_count() as i64;
    let positions: Vec<usize> = pattern
        .onsets()
        .into_iter()
        .map(|pos| {
            Ratio::new(pos as i64 * len as i64, n)
                .round()
                .to_integer()
                .rem_euclid(len as i64) as usize
        })
        .collect();
    Pattern::from_onsets(&positions, len, pattern.origin().clone())
}

/// Length of the common cycle, rejected when it exceeds `max_steps`
pub fn combined_length(patterns: &[Pattern], max_steps: usize) -> Result<usize> {
    let counts: Vec<i64> = patterns.iter().map(|p| p.step_count() as i64).collect();
    let lcm = lcm_many(&counts)?;
    match usize::try_from(lcm) {
        Ok(len) if len <= max_steps => Ok(len),
        _ => Err(ParseError::too_many_steps("combined step count", lcm, max_steps)),
    }
}

/// Union of at least two patterns on their common cycle, within the
/// default step ceiling
pub fn combine(patterns: &[Pattern]) -> Result<Pattern> {
    combine_within(patterns, DEFAULT_MAX_STEPS)
}

/// [`combine`] with an explicit ceiling on the combined length
pub fn combine_within(patterns: &[Pattern], max_steps: usize) -> Result<Pattern> {
    if patterns.len() < 2 {
        return Err(ParseError::InsufficientPatterns(patterns.len()));
    }

    let lcm = combined_length(patterns, max_steps)?;
    tracing::debug!(parts = patterns.len(), lcm, "combining patterns");

    let mut steps = vec![false; lcm];
    for pattern in patterns {
        let extended = extend_to(pattern, lcm)?;
        for pos in extended.onsets() {
            steps[pos] = true;
        }
    }

    Pattern::new(
        steps,
        Origin::Combined {
            parts: patterns.iter().map(|p| p.origin().clone()).collect(),
            lcm,
        },
    )
}

/// Clear every onset of `base` that an onset of a subtracted pattern lands on
pub fn subtract(base: &Pattern, subtracted: &[Pattern]) -> Result<Pattern> {
    let len = base.step_count();
    let mut steps = base.steps().to_vec();
    for pattern in subtracted {
        let extended = extend_to(pattern, len)?;
        tracing::trace!(cleared = ?extended.onsets(), "subtracting");
        for pos in extended.onsets() {
            steps[pos] = false;
        }
    }
    Pattern::new(steps, base.origin().clone())
}

/// `A+B-C`: union of `added` (a single operand is used as is), minus every
/// subtracted pattern
pub fn combine_and_subtract(
    added: &[Pattern],
    subtracted: &[Pattern],
    max_steps: usize,
) -> Result<Pattern> {
    let base = match added {
        [] => return Err(ParseError::InsufficientPatterns(0)),
        [only] => only.clone(),
        many => combine_within(many, max_steps)?,
    };
    subtract(&base, subtracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{euclidean, polygon};

    #[test]
    fn test_polygons_meet_on_lcm() {
        let combined = combine(&[polygon(3, 0, 1).unwrap(), polygon(5, 1, 1).unwrap()]).unwrap();
        assert_eq!(combined.step_count(), 15);
        assert_eq!(combined.onsets(), vec![0, 3, 5, 6, 9, 10, 12]);
        assert_eq!(combined.origin().tag(), "combined");
    }

    #[test]
    fn test_needs_two_patterns() {
        let one = vec![polygon(3, 0, 1).unwrap()];
        assert_eq!(combine(&one).unwrap_err(), ParseError::InsufficientPatterns(1));
        assert_eq!(combine(&[]).unwrap_err(), ParseError::InsufficientPatterns(0));
    }

    #[test]
    fn test_proportional_extension() {
        let tresillo = euclidean(3, 8, 0).unwrap();
        let extended = extend_to(&tresillo, 16).unwrap();
        assert_eq!(extended.onsets(), vec![0, 6, 12]);
        let shrunk = extend_to(&Pattern::from_binary("01").unwrap(), 3).unwrap();
        // 1 * 3 / 2 = 1.5 rounds up
        assert_eq!(shrunk.onsets(), vec![2]);
    }

    #[test]
    fn test_subtraction_maps_onto_result_length() {
        let base = combine(&[polygon(3, 0, 1).unwrap(), polygon(5, 1, 1).unwrap()]).unwrap();
        let result = subtract(&base, &[polygon(2, 0, 1).unwrap()]).unwrap();
        assert_eq!(result.step_count(), 15);
        assert_eq!(result.onsets(), vec![3, 5, 6, 9, 10, 12]);
    }

    #[test]
    fn test_single_added_operand_skips_combiner() {
        let e = euclidean(5, 8, 0).unwrap();
        let minus = Pattern::from_binary("10000000").unwrap();
        let result = combine_and_subtract(&[e], &[minus], DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(result.to_binary_string(), "00110110");
    }

    #[test]
    fn test_commutative_onsets() {
        let a = euclidean(3, 8, 0).unwrap();
        let b = polygon(3, 1, 1).unwrap();
        let ab = combine(&[a.clone(), b.clone()]).unwrap();
        let ba = combine(&[b, a]).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.step_count(), 24);
    }

    #[test]
    fn test_combined_length_is_capped() {
        let parts: Vec<Pattern> = [13, 17, 19]
            .iter()
            .map(|&n| euclidean(1, n, 0).unwrap())
            .collect();
        assert_eq!(combined_length(&parts, 5_000).unwrap(), 4199);
        assert_eq!(
            combine_within(&parts, 1_000).unwrap_err(),
            ParseError::too_many_steps("combined step count", 4199, 1_000)
        );
    }

    #[test]
    fn test_lcm_overflow_is_an_error() {
        let parts: Vec<Pattern> = [13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61]
            .iter()
            .map(|&n| euclidean(1, n, 0).unwrap())
            .collect();
        assert_eq!(
            combine_within(&parts, usize::MAX).unwrap_err(),
            ParseError::step_overflow("combined step count")
        );
        assert!(combine(&parts).is_err());
    }
}
