use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Everything that can go wrong turning text or parameters into a pattern.
///
/// Each variant carries the offending substring or value so callers can
/// report it without re-scanning the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    #[error("Unrecognized pattern format: '{0}'")]
    UnrecognizedFormat(String),

    #[error("Invalid binary digit '{digit}' in '{input}'")]
    InvalidBinaryDigit { input: String, digit: char },

    #[error("Onset {index} is out of range for {steps} steps")]
    OnsetOutOfRange { index: i64, steps: usize },

    #[error("Invalid Euclidean parameters E({beats},{steps}): need 0 < beats <= steps")]
    InvalidEuclideanParams { beats: i64, steps: i64 },

    #[error("Need at least 2 patterns to combine, got {0}")]
    InsufficientPatterns(usize),

    #[error("Empty input")]
    EmptyInput,

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Invalid polygon parameters P({vertices},_,{expansion}): need vertices >= 2 and expansion >= 1")]
    InvalidPolygonParams { vertices: i64, expansion: i64 },

    #[error("Invalid parameter for {context}: {value}")]
    InvalidParameter { context: String, value: String },

    #[error("Unbalanced '{delimiter}' in '{input}'")]
    UnbalancedDelimiters { input: String, delimiter: char },

    #[error("'comp' needs a Euclidean pattern, got '{0}'")]
    ComplementRequiresEuclidean(String),
}

impl ParseError {
    pub fn invalid_parameter(context: impl Into<String>, value: impl ToString) -> Self {
        ParseError::InvalidParameter {
            context: context.into(),
            value: value.to_string(),
        }
    }

    /// A step count above the configured ceiling
    pub fn too_many_steps(context: impl Into<String>, steps: impl ToString, max: usize) -> Self {
        ParseError::InvalidParameter {
            context: context.into(),
            value: format!("{} (max {})", steps.to_string(), max),
        }
    }

    /// A step count that does not fit the integer type computing it
    pub fn step_overflow(context: impl Into<String>) -> Self {
        ParseError::invalid_parameter(context, "overflow")
    }

    pub fn unrecognized(input: impl Into<String>) -> Self {
        ParseError::UnrecognizedFormat(input.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_offending_value() {
        let err = ParseError::InvalidBinaryDigit {
            input: "1021".to_string(),
            digit: '2',
        };
        assert_eq!(err.to_string(), "Invalid binary digit '2' in '1021'");

        let err = ParseError::unrecognized("zzz");
        assert!(err.to_string().contains("zzz"));
    }
}
