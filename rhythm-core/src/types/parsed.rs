//! Parser output: one pattern plus how it was assembled.

use super::pattern::Pattern;
use std::fmt;

/// What a quantization did to the onsets it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizationReport {
    pub original_steps: usize,
    pub quantized_steps: usize,
    pub clockwise: bool,
    pub original_onsets: usize,
    pub quantized_onsets: usize,
}

impl QuantizationReport {
    /// Onsets that collapsed onto an already-taken position
    pub fn lost_onsets(&self) -> usize {
        self.original_onsets.saturating_sub(self.quantized_onsets)
    }
}

/// Result of parsing one line of pattern notation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParsedPattern {
    Single(Pattern),
    /// `A+B-C`: the union of `added`, minus every onset of `subtracted`
    Combined {
        pattern: Pattern,
        added: Vec<Pattern>,
        subtracted: Vec<Pattern>,
    },
    /// `A B C`: parts played back to back. `dividers` are the step indices
    /// where each part after the first begins.
    Stringed {
        pattern: Pattern,
        parts: Vec<Pattern>,
        dividers: Vec<usize>,
    },
    /// `expr;N`
    Quantized {
        pattern: Pattern,
        source: Box<ParsedPattern>,
        report: QuantizationReport,
    },
    /// `name=expr`
    Named {
        name: String,
        inner: Box<ParsedPattern>,
    },
    /// `expr{accent}`
    Accented {
        inner: Box<ParsedPattern>,
        accent: Pattern,
    },
}

impl ParsedPattern {
    /// The resulting pattern, whatever the wrapping
    pub fn pattern(&self) -> &Pattern {
        match self {
            ParsedPattern::Single(pattern) => pattern,
            ParsedPattern::Combined { pattern, .. } => pattern,
            ParsedPattern::Stringed { pattern, .. } => pattern,
            ParsedPattern::Quantized { pattern, .. } => pattern,
            ParsedPattern::Named { inner, .. } => inner.pattern(),
            ParsedPattern::Accented { inner, .. } => inner.pattern(),
        }
    }

    pub fn into_pattern(self) -> Pattern {
        match self {
            ParsedPattern::Single(pattern) => pattern,
            ParsedPattern::Combined { pattern, .. } => pattern,
            ParsedPattern::Stringed { pattern, .. } => pattern,
            ParsedPattern::Quantized { pattern, .. } => pattern,
            ParsedPattern::Named { inner, .. } => inner.into_pattern(),
            ParsedPattern::Accented { inner, .. } => inner.into_pattern(),
        }
    }

    /// Name given with `name=...`, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            ParsedPattern::Named { name, .. } => Some(name),
            ParsedPattern::Accented { inner, .. } => inner.name(),
            _ => None,
        }
    }

    /// Accent layer given with `{...}`, if any
    pub fn accent(&self) -> Option<&Pattern> {
        match self {
            ParsedPattern::Accented { accent, .. } => Some(accent),
            ParsedPattern::Named { inner, .. } => inner.accent(),
            _ => None,
        }
    }

    /// Stringing divider positions, empty for non-stringed results
    pub fn dividers(&self) -> &[usize] {
        match self {
            ParsedPattern::Stringed { dividers, .. } => dividers,
            ParsedPattern::Named { inner, .. } | ParsedPattern::Accented { inner, .. } => {
                inner.dividers()
            }
            _ => &[],
        }
    }

    /// The innermost kind, looking through names and accents
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedPattern::Single(_) => "single",
            ParsedPattern::Combined { .. } => "combined",
            ParsedPattern::Stringed { .. } => "stringed",
            ParsedPattern::Quantized { .. } => "quantized",
            ParsedPattern::Named { inner, .. } | ParsedPattern::Accented { inner, .. } => {
                inner.kind()
            }
        }
    }
}

impl fmt::Display for ParsedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedPattern::Named { name, inner } => write!(f, "{} = {}", name, inner),
            ParsedPattern::Accented { inner, accent } => {
                write!(f, "{} {{accent: {}}}", inner, accent.to_binary_string())
            }
            other => write!(f, "{}", other.pattern()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pattern::{LiteralFormat, Origin};

    fn bits(s: &str) -> Pattern {
        Pattern::new(
            s.chars().map(|c| c == '1').collect(),
            Origin::Literal {
                format: LiteralFormat::Binary,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_wrappers_expose_inner_pattern() {
        let parsed = ParsedPattern::Named {
            name: "clave".to_string(),
            inner: Box::new(ParsedPattern::Accented {
                inner: Box::new(ParsedPattern::Single(bits("1001"))),
                accent: bits("1000"),
            }),
        };
        assert_eq!(parsed.pattern(), &bits("1001"));
        assert_eq!(parsed.name(), Some("clave"));
        assert_eq!(parsed.accent(), Some(&bits("1000")));
        assert_eq!(parsed.kind(), "single");
    }

    #[test]
    fn test_lost_onsets() {
        let report = QuantizationReport {
            original_steps: 8,
            quantized_steps: 4,
            clockwise: true,
            original_onsets: 5,
            quantized_onsets: 3,
        };
        assert_eq!(report.lost_onsets(), 2);
    }
}
