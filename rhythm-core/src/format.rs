//! One-line pattern summaries.

use crate::analysis::{balance, Quality};
use crate::codec;
use crate::types::Pattern;

/// `b<binary> | 0x<hex> | 0o<octal> | d<decimal> | <onsets>/<steps> [<tags>]`
///
/// Field order and tags are stable; front-ends print this verbatim.
/// Numeric fields follow the pattern's own reading order; see
/// [`format_compact_with`] to force standard order.
pub fn format_compact(pattern: &Pattern) -> String {
    format_compact_with(pattern, pattern.reads_reversed())
}

/// `format_compact` with the numeric fields read LSB-first when `reverse`
/// is set, so the line agrees with a caller that has switched bit order.
pub fn format_compact_with(pattern: &Pattern, reverse: bool) -> String {
    let decimal = codec::encode_decimal(pattern, reverse).unwrap_or_else(|| "d-".to_string());

    let mut tags = vec![pattern.origin().tag()];
    if balance(pattern).score == Quality::Perfect {
        tags.push("balanced".to_string());
    }

    format!(
        "b{} | {} | {} | {} | {}/{} [{}]",
        codec::encode_binary(pattern),
        codec::encode_hex(pattern, reverse),
        codec::encode_octal(pattern, reverse),
        decimal,
        pattern.onset_count(),
        pattern.step_count(),
        tags.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{euclidean, polygon};

    #[test]
    fn test_euclidean_line() {
        let line = format_compact(&euclidean(3, 8, 0).unwrap());
        assert_eq!(line, "b10010010 | 0x49 | 0o111:8 | d73:8 | 3/8 [euclidean]");
    }

    #[test]
    fn test_raw_binary_keeps_standard_order() {
        let line = format_compact(&Pattern::from_binary("10010010").unwrap());
        assert_eq!(line, "b10010010 | 0x92 | 0o222:8 | d146 | 3/8 [literal:binary]");
    }

    #[test]
    fn test_standard_order_override() {
        let line = format_compact_with(&euclidean(3, 8, 0).unwrap(), false);
        assert_eq!(line, "b10010010 | 0x92 | 0o222:8 | d146 | 3/8 [euclidean]");
    }

    #[test]
    fn test_balanced_tag() {
        let line = format_compact(&polygon(4, 0, 1).unwrap());
        assert!(line.ends_with("4/4 [polygon, balanced]"), "{}", line);
    }
}
