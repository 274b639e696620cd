//! Bjorklund algorithm for Euclidean rhythm generation.

use crate::error::{ParseError, Result};
use crate::transform::rotate_steps;
use crate::types::{Origin, Pattern, TransformKind};

/// Distribute `pulses` as evenly as possible across `steps` slots.
///
/// The result always starts with a pulse when `pulses > 0`.
pub fn bjorklund(pulses: usize, steps: usize) -> Vec<bool> {
    if steps == 0 {
        return vec![];
    }
    if pulses >= steps {
        return vec![true; steps];
    }
    if pulses == 0 {
        return vec![false; steps];
    }

    let mut pattern: Vec<Vec<bool>> = vec![vec![true]; pulses];
    let mut remainder: Vec<Vec<bool>> = vec![vec![false]; steps - pulses];

    while remainder.len() > 1 {
        let pairs = pattern.len().min(remainder.len());
        let mut paired = Vec::with_capacity(pairs);

        for i in 0..pairs {
            let mut group = pattern[i].clone();
            group.extend_from_slice(&remainder[i]);
            paired.push(group);
        }

        let leftover_pattern: Vec<_> = pattern.into_iter().skip(pairs).collect();
        let leftover_remainder: Vec<_> = remainder.into_iter().skip(pairs).collect();

        pattern = paired;
        remainder = if leftover_pattern.is_empty() {
            leftover_remainder
        } else {
            leftover_pattern
        };
    }

    pattern.into_iter().chain(remainder).flatten().collect()
}

fn check_params(beats: i64, steps: i64) -> Result<(usize, usize)> {
    if beats <= 0 || steps <= 0 || beats > steps {
        return Err(ParseError::InvalidEuclideanParams { beats, steps });
    }
    Ok((beats as usize, steps as usize))
}

/// `E(beats, steps, offset)`: the Bjorklund rhythm rotated forward by `offset`
pub fn euclidean(beats: i64, steps: i64, offset: i64) -> Result<Pattern> {
    let (b, s) = check_params(beats, steps)?;
    let rhythm = rotate_steps(&bjorklund(b, s), offset);
    Ok(Pattern::from_parts(
        rhythm,
        Origin::Euclidean {
            beats: b,
            steps: s,
            offset,
        },
    ))
}

/// Onset/rest swap of `E(beats, steps, offset)`
pub fn euclidean_complement(beats: i64, steps: i64, offset: i64) -> Result<Pattern> {
    let base = euclidean(beats, steps, offset)?;
    let origin = base.origin().clone().transformed(TransformKind::Complement);
    let swapped = base.steps().iter().map(|&s| !s).collect();
    Ok(Pattern::from_parts(swapped, origin))
}
