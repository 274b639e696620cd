//! Repetition and Euclidean-rhythm detection.

use crate::generators::bjorklund;
use crate::number_theory::divisors;
use crate::transform::rotate_steps;
use crate::types::Pattern;

/// The pattern is `count` copies of its first `unit` steps
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repetition {
    pub unit: usize,
    pub count: usize,
    /// Binary string of the repeated unit
    pub unit_pattern: String,
}

/// Parameters of the Euclidean rhythm equal to the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EuclideanMatch {
    pub beats: usize,
    pub steps: usize,
    pub offset: usize,
}

impl EuclideanMatch {
    pub fn formula(&self) -> String {
        format!("E({},{},{})", self.beats, self.steps, self.offset)
    }
}

/// Smallest proper repeating unit, if any
pub fn find_repetition(pattern: &Pattern) -> Option<Repetition> {
    let steps = pattern.steps();
    let n = steps.len();
    divisors(n)
        .into_iter()
        .filter(|&u| u < n)
        .find(|&u| steps.chunks(u).all(|chunk| chunk == &steps[..u]))
        .map(|unit| Repetition {
            unit,
            count: n / unit,
            unit_pattern: steps[..unit]
                .iter()
                .map(|&s| if s { '1' } else { '0' })
                .collect(),
        })
}

/// First offset `o` with `E(k, n, o)` equal to the pattern, `k` its onset count
pub fn detect_euclidean(pattern: &Pattern) -> Option<EuclideanMatch> {
    let beats = pattern.onset_count();
    if beats == 0 {
        return None;
    }
    let n = pattern.step_count();
    let base = bjorklund(beats, n);
    (0..n)
        .find(|&offset| rotate_steps(&base, offset as i64) == pattern.steps())
        .map(|offset| EuclideanMatch {
            beats,
            steps: n,
            offset,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(bits: &str) -> Pattern {
        Pattern::from_binary(bits).unwrap()
    }

    #[test]
    fn test_repetition() {
        let r = find_repetition(&p("100100100")).unwrap();
        assert_eq!((r.unit, r.count), (3, 3));
        assert_eq!(r.unit_pattern, "100");
        assert_eq!(find_repetition(&p("1111")).unwrap().unit, 1);
        assert!(find_repetition(&p("10010010")).is_none());
        assert!(find_repetition(&p("1")).is_none());
    }

    #[test]
    fn test_detect_euclidean() {
        let m = detect_euclidean(&p("10110110")).unwrap();
        assert_eq!(m.formula(), "E(5,8,0)");
        let m = detect_euclidean(&p("01001001")).unwrap();
        assert_eq!((m.beats, m.offset), (3, 1));
        assert!(detect_euclidean(&p("11000000")).is_none());
        assert!(detect_euclidean(&p("0000")).is_none());
    }
}
