//! Structural transformations. Every function returns a new pattern and
//! tags it with the transformation applied.

use crate::analysis::indispensability::indispensability_profile;
use crate::analysis::prosody::{classify_intervals, onset_intervals, IntervalClass};
use crate::error::{ParseError, Result};
use crate::generators::euclidean_complement;
use crate::types::{MeterGenerator, Origin, Pattern, QuantizationReport, TransformKind};
use num_rational::Ratio;
use std::cmp::Ordering;

/// `new[i] = old[(i - r) mod n]`
pub fn rotate_steps(steps: &[bool], r: i64) -> Vec<bool> {
    let n = steps.len();
    if n == 0 {
        return Vec::new();
    }
    let shift = r.rem_euclid(n as i64) as usize;
    (0..n).map(|i| steps[(i + n - shift) % n]).collect()
}

fn tagged(pattern: &Pattern, steps: Vec<bool>, kind: TransformKind) -> Pattern {
    Pattern::from_parts(steps, pattern.origin().clone().transformed(kind))
}

/// Move every onset `r` steps later, wrapping around
pub fn rotate(pattern: &Pattern, r: i64) -> Pattern {
    tagged(pattern, rotate_steps(pattern.steps(), r), TransformKind::Rotate(r))
}

/// Swap onsets and rests
pub fn invert(pattern: &Pattern) -> Pattern {
    let steps = pattern.steps().iter().map(|&s| !s).collect();
    tagged(pattern, steps, TransformKind::Invert)
}

/// Play the pattern backwards
pub fn retrograde(pattern: &Pattern) -> Pattern {
    let steps = pattern.steps().iter().rev().copied().collect();
    tagged(pattern, steps, TransformKind::Retrograde)
}

/// Complement of a Euclidean pattern
pub fn complement(pattern: &Pattern) -> Result<Pattern> {
    match pattern.origin() {
        Origin::Euclidean {
            beats,
            steps,
            offset,
        } => euclidean_complement(*beats as i64, *steps as i64, *offset),
        other => Err(ParseError::ComplementRequiresEuclidean(other.to_string())),
    }
}

/// Each step becomes `factor` steps: an onset followed by rests, or only rests
pub fn stretch(pattern: &Pattern, factor: usize) -> Result<Pattern> {
    if factor == 0 {
        return Err(ParseError::invalid_parameter("stretch factor", 0));
    }
    let len = pattern
        .step_count()
        .checked_mul(factor)
        .ok_or_else(|| ParseError::step_overflow("stretched step count"))?;
    let mut steps = Vec::with_capacity(len);
    for &on in pattern.steps() {
        steps.push(on);
        steps.extend(std::iter::repeat(false).take(factor - 1));
    }
    Ok(tagged(pattern, steps, TransformKind::Stretch(factor)))
}

/// Resample to `new_steps` by picking the nearest source step for each new
/// step. Lossy when onsets sit between the picked steps.
pub fn squeeze(pattern: &Pattern, new_steps: usize) -> Result<Pattern> {
    if new_steps == 0 {
        return Err(ParseError::invalid_parameter("squeeze length", 0));
    }
    let n = pattern.step_count() as i64;
    let m = new_steps as i64;
    let steps = (0..m)
        .map(|j| {
            let source = Ratio::new(j * n, m).round().to_integer().rem_euclid(n);
            pattern.steps()[source as usize]
        })
        .collect();
    Ok(tagged(pattern, steps, TransformKind::Squeeze(new_steps)))
}

fn duration_lengths(pattern: &Pattern, short: usize, long: usize) -> Result<Vec<usize>> {
    if short == 0 || long == 0 {
        return Err(ParseError::invalid_parameter(
            "durations",
            format!("{},{}", short, long),
        ));
    }
    let intervals = onset_intervals(pattern);
    Ok(classify_intervals(&intervals)
        .into_iter()
        .map(|class| match class {
            IntervalClass::Long => long,
            IntervalClass::Short | IntervalClass::Equal => short,
        })
        .collect())
}

fn total_length(lengths: &[usize]) -> Result<usize> {
    lengths
        .iter()
        .try_fold(0usize, |total, &len| total.checked_add(len))
        .ok_or_else(|| ParseError::step_overflow("durations step count"))
}

/// Step count [`with_durations`] would produce
pub fn durations_length(pattern: &Pattern, short: usize, long: usize) -> Result<usize> {
    let lengths = duration_lengths(pattern, short, long)?;
    if lengths.is_empty() {
        return Ok(pattern.step_count());
    }
    total_length(&lengths)
}

/// Rebuild the pattern with short intervals of length `short` and long
/// intervals of length `long`. The first onset moves to position 0.
pub fn with_durations(pattern: &Pattern, short: usize, long: usize) -> Result<Pattern> {
    let lengths = duration_lengths(pattern, short, long)?;
    if lengths.is_empty() {
        return Ok(pattern.clone());
    }
    let total = total_length(&lengths)?;

    let mut steps = Vec::with_capacity(total);
    for length in lengths {
        steps.push(true);
        steps.extend(std::iter::repeat(false).take(length - 1));
    }
    Ok(tagged(pattern, steps, TransformKind::Durations { short, long }))
}

/// Angular resampling to `new_steps`.
///
/// Each onset keeps its phase on the circle (mirrored when not clockwise)
/// and lands on the nearest new step; onsets landing on the same step merge.
pub fn quantize(
    pattern: &Pattern,
    new_steps: usize,
    clockwise: bool,
    max_steps: usize,
) -> Result<(Pattern, QuantizationReport)> {
    if new_steps == 0 || new_steps > max_steps {
        return Err(ParseError::invalid_parameter(
            "quantization step count",
            format!("{} (allowed 1..={})", new_steps, max_steps),
        ));
    }

    let n = pattern.step_count();
    let quantized = if new_steps == n {
        pattern.clone()
    } else {
        let (n_i, m_i) = (n as i64, new_steps as i64);
        let mut steps = vec![false; new_steps];
        for pos in pattern.onsets() {
            let phase = if clockwise { pos as i64 } else { n_i - pos as i64 };
            let target = Ratio::new(phase * m_i, n_i).round().to_integer().rem_euclid(m_i);
            steps[target as usize] = true;
        }
        Pattern::from_parts(
            steps,
            Origin::Quantized {
                base: Box::new(pattern.origin().clone()),
                clockwise,
            },
        )
    };

    let report = QuantizationReport {
        original_steps: n,
        quantized_steps: new_steps,
        clockwise,
        original_onsets: pattern.onset_count(),
        quantized_onsets: quantized.onset_count(),
    };
    tracing::debug!(
        from = n,
        to = new_steps,
        clockwise,
        lost = report.lost_onsets(),
        "quantized pattern"
    );
    Ok((quantized, report))
}

/// Positions sorted by weight, strongest first. Wolrab flips the weights.
fn by_weight(positions: Vec<usize>, profile: &[f64], generator: MeterGenerator) -> Vec<usize> {
    let mut positions = positions;
    let weight = |p: usize| match generator {
        MeterGenerator::Wolrab => -profile[p],
        _ => profile[p],
    };
    positions.sort_by(|&a, &b| {
        weight(b)
            .partial_cmp(&weight(a))
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    positions
}

fn move_density(pattern: &Pattern, target: usize, generator: MeterGenerator) -> Result<Pattern> {
    let n = pattern.step_count();
    if target > n {
        return Err(ParseError::invalid_parameter(
            "onset count",
            format!("{} of {} steps", target, n),
        ));
    }

    let profile = indispensability_profile(n);
    let mut steps = pattern.steps().to_vec();
    let current = pattern.onset_count();

    match current.cmp(&target) {
        Ordering::Greater => {
            // weakest onsets go first
            let onsets = by_weight(pattern.onsets(), &profile, generator);
            for &pos in onsets.iter().rev().take(current - target) {
                steps[pos] = false;
            }
        }
        Ordering::Less => {
            let rests: Vec<usize> = (0..n).filter(|&i| !steps[i]).collect();
            for pos in by_weight(rests, &profile, generator)
                .into_iter()
                .take(target - current)
            {
                steps[pos] = true;
            }
        }
        Ordering::Equal => {}
    }

    Ok(tagged(
        pattern,
        steps,
        TransformKind::Density {
            generator,
            onsets: target,
        },
    ))
}

/// Add or remove onsets by indispensability until `target` remain: new
/// onsets take the strongest free positions, removals take the weakest onsets.
pub fn barlow_to(pattern: &Pattern, target: usize) -> Result<Pattern> {
    move_density(pattern, target, MeterGenerator::Barlow)
}

/// The opposite of [`barlow_to`]: adds on weak positions, removes strong ones
pub fn wolrab_to(pattern: &Pattern, target: usize) -> Result<Pattern> {
    move_density(pattern, target, MeterGenerator::Wolrab)
}

/// Apply a transformation described by `kind`
pub fn transform(pattern: &Pattern, kind: &TransformKind) -> Result<Pattern> {
    match kind {
        TransformKind::Rotate(r) => Ok(rotate(pattern, *r)),
        TransformKind::Invert => Ok(invert(pattern)),
        TransformKind::Retrograde => Ok(retrograde(pattern)),
        TransformKind::Complement => complement(pattern),
        TransformKind::Stretch(factor) => stretch(pattern, *factor),
        TransformKind::Squeeze(steps) => squeeze(pattern, *steps),
        TransformKind::Durations { short, long } => with_durations(pattern, *short, *long),
        TransformKind::Density { generator, onsets } => match generator {
            MeterGenerator::Wolrab => wolrab_to(pattern, *onsets),
            _ => barlow_to(pattern, *onsets),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{euclidean, polygon};

    fn p(bits: &str) -> Pattern {
        Pattern::from_binary(bits).unwrap()
    }

    #[test]
    fn test_rotate() {
        assert_eq!(rotate(&p("10010010"), 1).to_binary_string(), "01001001");
        assert_eq!(rotate(&p("10010010"), -1).to_binary_string(), "00100101");
        assert_eq!(rotate(&p("1100"), 6).to_binary_string(), "0011");
        assert_eq!(rotate(&p("1100"), 0), p("1100"));
    }

    #[test]
    fn test_invert_and_retrograde() {
        assert_eq!(invert(&p("1010")).to_binary_string(), "0101");
        assert_eq!(retrograde(&p("1100")).to_binary_string(), "0011");
        assert_eq!(invert(&p("1")).origin().tag(), "transformed:invert");
    }

    #[test]
    fn test_complement_needs_euclidean() {
        let e = euclidean(3, 8, 0).unwrap();
        assert_eq!(complement(&e).unwrap().to_binary_string(), "01101101");

        let poly = polygon(3, 0, 1).unwrap();
        assert!(matches!(
            complement(&poly),
            Err(ParseError::ComplementRequiresEuclidean(_))
        ));
    }

    #[test]
    fn test_stretch() {
        assert_eq!(stretch(&p("101"), 2).unwrap().to_binary_string(), "100010");
        assert!(stretch(&p("1"), 0).is_err());
        assert_eq!(
            stretch(&p("111"), usize::MAX).unwrap_err(),
            ParseError::step_overflow("stretched step count")
        );
    }

    #[test]
    fn test_squeeze_nearest_index() {
        assert_eq!(squeeze(&p("10001000"), 4).unwrap().to_binary_string(), "1010");
        assert_eq!(squeeze(&p("10101010"), 4).unwrap().to_binary_string(), "1111");
    }

    #[test]
    fn test_durations() {
        // tresillo intervals 3,3,2: long long short
        let rebuilt = with_durations(&p("10010010"), 1, 2).unwrap();
        assert_eq!(rebuilt.to_binary_string(), "10101");
        // first onset moves to the downbeat
        let rebuilt = with_durations(&p("0101"), 3, 3).unwrap();
        assert_eq!(rebuilt.to_binary_string(), "100100");
    }

    #[test]
    fn test_durations_length() {
        assert_eq!(durations_length(&p("10010010"), 1, 2).unwrap(), 5);
        assert_eq!(durations_length(&p("0000"), 1, 2).unwrap(), 4);
        assert_eq!(
            durations_length(&p("10010010"), 1, usize::MAX).unwrap_err(),
            ParseError::step_overflow("durations step count")
        );
    }

    #[test]
    fn test_quantize_clockwise() {
        let (q, report) = quantize(&p("10010010"), 16, true, 128).unwrap();
        assert_eq!(q.onsets(), vec![0, 6, 12]);
        assert_eq!(report.lost_onsets(), 0);
        assert_eq!(q.origin().tag(), "quantized");
    }

    #[test]
    fn test_quantize_counter_clockwise_mirrors() {
        let (q, _) = quantize(&p("11000000"), 8, false, 128).unwrap();
        // same step count: unchanged
        assert_eq!(q.to_binary_string(), "11000000");
        let (q, _) = quantize(&p("11000000"), 16, false, 128).unwrap();
        assert_eq!(q.onsets(), vec![0, 14]);
    }

    #[test]
    fn test_quantize_collisions_and_limits() {
        let (q, report) = quantize(&p("11110000"), 2, true, 128).unwrap();
        assert_eq!(q.to_binary_string(), "11");
        assert_eq!(report.original_onsets, 4);
        assert_eq!(report.lost_onsets(), 2);

        let (q, _) = quantize(&p("0000"), 3, true, 128).unwrap();
        assert!(q.is_silent());
        assert!(quantize(&p("1"), 0, true, 128).is_err());
        assert!(quantize(&p("1"), 129, true, 128).is_err());
    }

    #[test]
    fn test_density_moves() {
        let denser = barlow_to(&p("10000000"), 4).unwrap();
        assert_eq!(denser.to_binary_string(), "10101010");
        let thinner = barlow_to(&p("11111111"), 2).unwrap();
        assert_eq!(thinner.to_binary_string(), "10001000");
        let weak = wolrab_to(&p("10000000"), 2).unwrap();
        assert_eq!(weak.onsets(), vec![0, 1]);
        let strong_removed = wolrab_to(&p("11000000"), 1).unwrap();
        assert_eq!(strong_removed.onsets(), vec![1]);
        assert!(barlow_to(&p("1"), 2).is_err());
    }

    #[test]
    fn test_transform_dispatch() {
        let base = p("10010010");
        let rotated = transform(&base, &TransformKind::Rotate(2)).unwrap();
        assert_eq!(rotated, rotate(&base, 2));
        assert_eq!(rotated.origin().tag(), "transformed:rotate");
    }
}
