//! Composite syncopation score.
//!
//! Six measures, each in `[0, 1]`, read cyclically against a beat grid
//! derived from the step count. The Barlow measure compares the onsets'
//! summed indispensability against the strongest and weakest placements of
//! the same number of onsets.

use super::indispensability::{indispensability_profile, normalized_profile};
use crate::types::Pattern;
use num_rational::Ratio;
use std::fmt;

const WEIGHTS: [f64; 6] = [0.20, 0.15, 0.20, 0.15, 0.15, 0.15];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SyncopationLevel {
    Minimal,
    Low,
    Moderate,
    High,
}

impl SyncopationLevel {
    fn from_score(score: f64) -> Self {
        if score < 0.15 {
            SyncopationLevel::Minimal
        } else if score < 0.35 {
            SyncopationLevel::Low
        } else if score < 0.6 {
            SyncopationLevel::Moderate
        } else {
            SyncopationLevel::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SyncopationLevel::Minimal => "minimal",
            SyncopationLevel::Low => "low",
            SyncopationLevel::Moderate => "moderate",
            SyncopationLevel::High => "high",
        }
    }
}

impl fmt::Display for SyncopationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncopationAnalysis {
    pub note_to_beat: f64,
    pub off_beat_ratio: f64,
    pub expectancy_violation: f64,
    pub displacement: f64,
    pub cross_rhythmic: f64,
    pub barlow: f64,
    pub composite: f64,
    pub level: SyncopationLevel,
}

impl SyncopationAnalysis {
    fn silent() -> Self {
        Self {
            note_to_beat: 0.0,
            off_beat_ratio: 0.0,
            expectancy_violation: 0.0,
            displacement: 0.0,
            cross_rhythmic: 0.0,
            barlow: 0.0,
            composite: 0.0,
            level: SyncopationLevel::Minimal,
        }
    }
}

/// Steps per beat: quarters, then thirds, then halves, else the whole cycle
pub fn beat_stride(steps: usize) -> usize {
    if steps == 0 {
        return 1;
    }
    for parts in [4, 3, 2] {
        if steps % parts == 0 {
            return steps / parts;
        }
    }
    steps
}

struct Grid<'a> {
    steps: &'a [bool],
    onsets: Vec<usize>,
    stride: usize,
}

impl Grid<'_> {
    fn n(&self) -> usize {
        self.steps.len()
    }

    fn on_beat(&self, pos: usize) -> bool {
        pos % self.stride == 0
    }

    fn beats(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n()).step_by(self.stride)
    }

    fn onset_fraction(&self, hits: usize) -> f64 {
        hits as f64 / self.onsets.len() as f64
    }
}

/// Silent beats anticipated by an onset between the previous beat and them
fn note_to_beat(grid: &Grid) -> f64 {
    let n = grid.n();
    let beats: Vec<usize> = grid.beats().collect();
    let anticipated = beats
        .iter()
        .filter(|&&b| {
            !grid.steps[b] && (1..grid.stride).any(|back| grid.steps[(b + n - back) % n])
        })
        .count();
    anticipated as f64 / beats.len() as f64
}

fn off_beat_ratio(grid: &Grid) -> f64 {
    let off = grid.onsets.iter().filter(|&&p| !grid.on_beat(p)).count();
    grid.onset_fraction(off)
}

/// Onsets that are followed by a silent, stronger position
fn expectancy_violation(grid: &Grid, weights: &[f64]) -> f64 {
    let n = grid.n();
    let total: f64 = grid
        .onsets
        .iter()
        .map(|&p| {
            let next = (p + 1) % n;
            if !grid.steps[next] && weights[next] > weights[p] {
                weights[next] - weights[p]
            } else {
                0.0
            }
        })
        .sum();
    total / grid.onsets.len() as f64
}

fn displacement(grid: &Grid) -> f64 {
    if grid.stride < 2 {
        return 0.0;
    }
    let half = grid.stride as f64 / 2.0;
    let total: f64 = grid
        .onsets
        .iter()
        .map(|&p| {
            let into = p % grid.stride;
            into.min(grid.stride - into) as f64 / half
        })
        .sum();
    total / grid.onsets.len() as f64
}

/// Onsets on the cross grid (3 against a duple beat, 2 against a triple
/// one) that miss the beat grid
fn cross_rhythmic(grid: &Grid) -> f64 {
    let n = grid.n();
    let triple = n % 4 != 0 && n % 3 == 0;
    let divisions: i64 = if triple { 2 } else { 3 };
    let cross: Vec<usize> = (0..divisions)
        .map(|k| {
            Ratio::new(k * n as i64, divisions)
                .round()
                .to_integer()
                .rem_euclid(n as i64) as usize
        })
        .collect();
    let hits = grid
        .onsets
        .iter()
        .filter(|&&p| cross.contains(&p) && !grid.on_beat(p))
        .count();
    grid.onset_fraction(hits)
}

fn barlow(grid: &Grid, profile: &[f64]) -> f64 {
    let k = grid.onsets.len();
    let actual: f64 = grid.onsets.iter().map(|&p| profile[p]).sum();
    let mut sorted = profile.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let best: f64 = sorted[..k].iter().sum();
    let worst: f64 = sorted[sorted.len() - k..].iter().sum();
    if (best - worst).abs() < 1e-12 {
        return 0.0;
    }
    ((best - actual) / (best - worst)).clamp(0.0, 1.0)
}

pub fn syncopation(pattern: &Pattern) -> SyncopationAnalysis {
    let onsets = pattern.onsets();
    if onsets.is_empty() {
        return SyncopationAnalysis::silent();
    }

    let n = pattern.step_count();
    let grid = Grid {
        steps: pattern.steps(),
        onsets,
        stride: beat_stride(n),
    };
    let profile = indispensability_profile(n);
    let weights = normalized_profile(n);

    let scores = [
        note_to_beat(&grid),
        off_beat_ratio(&grid),
        expectancy_violation(&grid, &weights),
        displacement(&grid),
        cross_rhythmic(&grid),
        barlow(&grid, &profile),
    ];
    let composite: f64 = scores.iter().zip(WEIGHTS).map(|(s, w)| s * w).sum();

    SyncopationAnalysis {
        note_to_beat: scores[0],
        off_beat_ratio: scores[1],
        expectancy_violation: scores[2],
        displacement: scores[3],
        cross_rhythmic: scores[4],
        barlow: scores[5],
        composite,
        level: SyncopationLevel::from_score(composite),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync(bits: &str) -> SyncopationAnalysis {
        syncopation(&Pattern::from_binary(bits).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!(close(WEIGHTS.iter().sum::<f64>(), 1.0));
    }

    #[test]
    fn test_beat_stride() {
        assert_eq!(beat_stride(16), 4);
        assert_eq!(beat_stride(12), 3);
        assert_eq!(beat_stride(9), 3);
        assert_eq!(beat_stride(10), 5);
        assert_eq!(beat_stride(7), 7);
    }

    #[test]
    fn test_on_beat_pattern_is_unsyncopated() {
        let s = sync("10101010");
        assert!(close(s.composite, 0.0));
        assert_eq!(s.level, SyncopationLevel::Minimal);
    }

    #[test]
    fn test_tresillo_sub_scores() {
        let s = sync("10010010");
        // beat 4 is silent and anticipated by the onset on 3
        assert!(close(s.note_to_beat, 0.25));
        assert!(close(s.off_beat_ratio, 1.0 / 3.0));
        assert!(close(s.expectancy_violation, (6.0 / 7.0) / 3.0));
        assert!(close(s.displacement, 1.0 / 3.0));
        assert!(close(s.cross_rhythmic, 1.0 / 3.0));
        assert!(close(s.barlow, 6.0 / 14.0));
        assert_eq!(s.level, SyncopationLevel::Low);
    }

    #[test]
    fn test_scores_bounded() {
        for bits in ["01010101", "0110", "1000000", "011011011", "1111"] {
            let s = sync(bits);
            for v in [
                s.note_to_beat,
                s.off_beat_ratio,
                s.expectancy_violation,
                s.displacement,
                s.cross_rhythmic,
                s.barlow,
                s.composite,
            ] {
                assert!((0.0..=1.0).contains(&v), "{} -> {}", bits, v);
            }
        }
    }

    #[test]
    fn test_silent_pattern() {
        let s = sync("0000");
        assert_eq!(s.composite, 0.0);
        assert_eq!(s.level, SyncopationLevel::Minimal);
    }

    #[test]
    fn test_off_beats_score_high() {
        let s = sync("01010101");
        assert!(close(s.off_beat_ratio, 1.0));
        assert!(s.composite > sync("10101010").composite);
    }
}
