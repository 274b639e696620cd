//! The canonical onset pattern and its provenance tag.

use crate::error::{ParseError, Result};
use std::fmt;

#[cfg(feature = "colored")]
use colored::*;

/// Textual encoding a literal pattern was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralFormat {
    Binary,
    Hex,
    Octal,
    Decimal,
    Onsets,
    Morse,
}

impl LiteralFormat {
    pub fn name(&self) -> &'static str {
        match self {
            LiteralFormat::Binary => "binary",
            LiteralFormat::Hex => "hex",
            LiteralFormat::Octal => "octal",
            LiteralFormat::Decimal => "decimal",
            LiteralFormat::Onsets => "onsets",
            LiteralFormat::Morse => "morse",
        }
    }

    /// Parse a format name (case-insensitive)
    pub fn from_name(s: &str) -> Option<LiteralFormat> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" | "b" => Some(LiteralFormat::Binary),
            "hex" | "hexadecimal" | "x" => Some(LiteralFormat::Hex),
            "octal" | "oct" | "o" => Some(LiteralFormat::Octal),
            "decimal" | "dec" | "d" => Some(LiteralFormat::Decimal),
            "onsets" | "array" | "onset" => Some(LiteralFormat::Onsets),
            "morse" | "m" => Some(LiteralFormat::Morse),
            _ => None,
        }
    }
}

/// Onset-ranking generators built on the indispensability metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeterGenerator {
    /// Most indispensable positions first
    Barlow,
    /// Least indispensable positions first (downbeat kept)
    Wolrab,
    /// Anti-Euclidean: complement of the complementary Euclidean rhythm
    Dilcue,
}

impl MeterGenerator {
    pub fn name(&self) -> &'static str {
        match self {
            MeterGenerator::Barlow => "barlow",
            MeterGenerator::Wolrab => "wolrab",
            MeterGenerator::Dilcue => "dilcue",
        }
    }
}

/// A structural transformation and its parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformKind {
    Rotate(i64),
    Invert,
    Retrograde,
    Complement,
    Stretch(usize),
    Squeeze(usize),
    Durations { short: usize, long: usize },
    Density { generator: MeterGenerator, onsets: usize },
}

impl TransformKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Rotate(_) => "rotate",
            TransformKind::Invert => "invert",
            TransformKind::Retrograde => "retrograde",
            TransformKind::Complement => "complement",
            TransformKind::Stretch(_) => "stretch",
            TransformKind::Squeeze(_) => "squeeze",
            TransformKind::Durations { .. } => "durations",
            TransformKind::Density { .. } => "density",
        }
    }
}

/// Where a pattern came from.
///
/// Display metadata only: two patterns with the same steps are equal
/// whatever their origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    Literal {
        format: LiteralFormat,
    },
    Polygon {
        vertices: usize,
        offset: i64,
        expansion: usize,
    },
    Euclidean {
        beats: usize,
        steps: usize,
        offset: i64,
    },
    Random {
        onsets: usize,
        steps: usize,
    },
    Generated {
        generator: MeterGenerator,
        onsets: usize,
        steps: usize,
    },
    Combined {
        parts: Vec<Origin>,
        lcm: usize,
    },
    Transformed {
        base: Box<Origin>,
        kind: TransformKind,
    },
    Stringed {
        parts: Vec<Origin>,
    },
    Quantized {
        base: Box<Origin>,
        clockwise: bool,
    },
}

impl Origin {
    /// Short tag used by compact output
    pub fn tag(&self) -> String {
        match self {
            Origin::Literal { format } => format!("literal:{}", format.name()),
            Origin::Polygon { .. } => "polygon".to_string(),
            Origin::Euclidean { .. } => "euclidean".to_string(),
            Origin::Random { .. } => "random".to_string(),
            Origin::Generated { generator, .. } => generator.name().to_string(),
            Origin::Combined { .. } => "combined".to_string(),
            Origin::Transformed { kind, .. } => format!("transformed:{}", kind.name()),
            Origin::Stringed { .. } => "stringed".to_string(),
            Origin::Quantized { .. } => "quantized".to_string(),
        }
    }

    /// Transform tag wrapping `self`
    pub fn transformed(self, kind: TransformKind) -> Origin {
        Origin::Transformed {
            base: Box::new(self),
            kind,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Literal { format } => write!(f, "{}", format.name()),
            Origin::Polygon {
                vertices,
                offset,
                expansion,
            } => {
                if *expansion == 1 {
                    write!(f, "P({},{})", vertices, offset)
                } else {
                    write!(f, "P({},{},{})", vertices, offset, expansion)
                }
            }
            Origin::Euclidean {
                beats,
                steps,
                offset,
            } => write!(f, "E({},{},{})", beats, steps, offset),
            Origin::Random { onsets, steps } => write!(f, "R({},{})", onsets, steps),
            Origin::Generated {
                generator,
                onsets,
                steps,
            } => {
                let letter = match generator {
                    MeterGenerator::Barlow => 'B',
                    MeterGenerator::Wolrab => 'W',
                    MeterGenerator::Dilcue => 'D',
                };
                write!(f, "{}({},{})", letter, onsets, steps)
            }
            Origin::Combined { parts, lcm } => {
                let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{} @ {} steps", parts.join(" + "), lcm)
            }
            Origin::Transformed { base, kind } => match kind {
                TransformKind::Rotate(r) => write!(f, "{}@{}", base, r),
                TransformKind::Invert => write!(f, "~{}", base),
                TransformKind::Retrograde => write!(f, "rev {}", base),
                TransformKind::Complement => write!(f, "comp {}", base),
                TransformKind::Stretch(factor) => write!(f, "S:{} {}", factor, base),
                TransformKind::Squeeze(steps) => write!(f, "squeeze({}) {}", steps, base),
                TransformKind::Durations { short, long } => {
                    write!(f, "D:{},{} {}", short, long, base)
                }
                TransformKind::Density { generator, onsets } => {
                    write!(f, "{}>{} {}", generator.name(), onsets, base)
                }
            },
            Origin::Stringed { parts } => {
                let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            Origin::Quantized { base, clockwise } => {
                write!(f, "{};{}", base, if *clockwise { "cw" } else { "ccw" })
            }
        }
    }
}

/// A cyclic onset pattern.
///
/// `steps[0]` is the first temporal position (the downbeat). A pattern always
/// has at least one step; an all-rest pattern is valid.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    steps: Vec<bool>,
    origin: Origin,
}

impl Pattern {
    /// Build a pattern from raw steps, rejecting the empty sequence
    pub fn new(steps: Vec<bool>, origin: Origin) -> Result<Self> {
        if steps.is_empty() {
            return Err(ParseError::invalid_parameter("step count", 0));
        }
        Ok(Self { steps, origin })
    }

    /// Pattern with the given onsets switched on
    pub fn from_onsets(onsets: &[usize], step_count: usize, origin: Origin) -> Result<Self> {
        let mut steps = vec![false; step_count];
        for &i in onsets {
            if i >= step_count {
                return Err(ParseError::OnsetOutOfRange {
                    index: i as i64,
                    steps: step_count,
                });
            }
            steps[i] = true;
        }
        Self::new(steps, origin)
    }

    /// Binary literal pattern, mostly for tests and examples: `"10010010"`
    pub fn from_binary(bits: &str) -> Result<Self> {
        crate::codec::decode_binary(bits)
    }

    /// Callers guarantee `steps` is non-empty
    pub(crate) fn from_parts(steps: Vec<bool>, origin: Origin) -> Self {
        debug_assert!(!steps.is_empty(), "patterns have at least one step");
        Self { steps, origin }
    }

    pub fn steps(&self) -> &[bool] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<bool> {
        self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Number of `true` steps
    pub fn onset_count(&self) -> usize {
        self.steps.iter().filter(|&&s| s).count()
    }

    /// Indices of the onsets, ascending
    pub fn onsets(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect()
    }

    pub fn is_silent(&self) -> bool {
        !self.steps.iter().any(|&s| s)
    }

    pub fn is_onset(&self, index: usize) -> bool {
        self.steps[index % self.steps.len()]
    }

    /// `'1'`/`'0'` per step
    pub fn to_binary_string(&self) -> String {
        self.steps.iter().map(|&s| if s { '1' } else { '0' }).collect()
    }

    /// Bit order used when showing this pattern as a number.
    ///
    /// Patterns typed as raw binary keep the standard left-to-right reading;
    /// everything else puts the downbeat in bit 0.
    pub fn reads_reversed(&self) -> bool {
        !matches!(
            self.origin,
            Origin::Literal {
                format: LiteralFormat::Binary
            }
        )
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl Eq for Pattern {}

#[cfg(feature = "colored")]
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .steps
            .iter()
            .map(|&on| {
                if on {
                    "x".bright_yellow().bold().to_string()
                } else {
                    ".".bright_black().to_string()
                }
            })
            .collect();
        write!(f, "{}", cells.join(" "))
    }
}

// Plain Display impl for non-colored builds (WASM)
#[cfg(not(feature = "colored"))]
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<&str> = self
            .steps
            .iter()
            .map(|&on| if on { "x" } else { "." })
            .collect();
        write!(f, "{}", cells.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal() -> Origin {
        Origin::Literal {
            format: LiteralFormat::Binary,
        }
    }

    #[test]
    fn test_empty_steps_rejected() {
        assert!(Pattern::new(vec![], literal()).is_err());
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = Pattern::new(vec![true, false, true], literal()).unwrap();
        let b = Pattern::new(
            vec![true, false, true],
            Origin::Euclidean {
                beats: 2,
                steps: 3,
                offset: 0,
            },
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_onsets_and_counts() {
        let p = Pattern::from_onsets(&[0, 3, 6], 8, literal()).unwrap();
        assert_eq!(p.step_count(), 8);
        assert_eq!(p.onset_count(), 3);
        assert_eq!(p.onsets(), vec![0, 3, 6]);
        assert_eq!(p.to_binary_string(), "10010010");
        assert!(!p.is_silent());
    }

    #[test]
    fn test_from_onsets_out_of_range() {
        let err = Pattern::from_onsets(&[8], 8, literal()).unwrap_err();
        assert_eq!(err, ParseError::OnsetOutOfRange { index: 8, steps: 8 });
    }

    #[test]
    fn test_bit_order_follows_origin() {
        let raw = Pattern::new(vec![true], literal()).unwrap();
        assert!(!raw.reads_reversed());
        let hex = raw.with_origin(Origin::Literal {
            format: LiteralFormat::Hex,
        });
        assert!(hex.reads_reversed());
    }

    #[test]
    fn test_origin_display() {
        let origin = Origin::Euclidean {
            beats: 3,
            steps: 8,
            offset: 0,
        }
        .transformed(TransformKind::Rotate(2));
        assert_eq!(origin.to_string(), "E(3,8,0)@2");
        assert_eq!(origin.tag(), "transformed:rotate");
    }
}
