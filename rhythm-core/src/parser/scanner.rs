//! Depth-aware scanning of pattern expressions: delimiter checks, operator
//! splitting and the segment classifier used for pattern stringing.

use crate::error::{ParseError, Result};
use crate::generators::morse::is_raw_morse;
use crate::generators::named_rhythm;

/// Prefix words that transform the expression after them
pub(crate) const PREFIX_WORDS: &[&str] = &["inv", "rev", "comp"];

fn opener(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// Every `(`, `[` and `{` is closed by its own kind, in order
pub(crate) fn check_balanced(text: &str) -> Result<()> {
    let mut stack = Vec::new();
    for c in text.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                if stack.pop() != Some(opener(c)) {
                    return Err(ParseError::UnbalancedDelimiters {
                        input: text.to_string(),
                        delimiter: c,
                    });
                }
            }
            _ => {}
        }
    }
    match stack.pop() {
        Some(open) => Err(ParseError::UnbalancedDelimiters {
            input: text.to_string(),
            delimiter: open,
        }),
        None => Ok(()),
    }
}

fn is_balanced(text: &str) -> bool {
    check_balanced(text).is_ok()
}

/// Byte offsets of the characters outside any brackets that match `pred`
fn top_level(text: &str, pred: impl Fn(char) -> bool) -> Vec<usize> {
    let mut depth = 0i32;
    let mut found = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if depth == 0 && pred(c) => found.push(i),
            _ => {}
        }
    }
    found
}

pub(crate) fn find_top_level(text: &str, target: char) -> Option<usize> {
    top_level(text, |c| c == target).first().copied()
}

pub(crate) fn rfind_top_level(text: &str, target: char) -> Option<usize> {
    top_level(text, |c| c == target).last().copied()
}

/// Offset of the bracket closing the one opened at `open`
pub(crate) fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Subtract,
}

fn ends_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ')' || c == ']'
}

fn starts_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '(' | '[' | '~')
}

/// `-` between two operands, as opposed to a Morse dash or a negative number
fn is_subtraction(text: &str, at: usize) -> bool {
    let before = text[..at].trim_end().chars().next_back();
    let after = text[at + 1..].trim_start().chars().next();
    matches!((before, after), (Some(b), Some(a)) if ends_operand(b) && starts_operand(a))
}

/// Split `A+B-C` into signed operands. `None` when there is no top-level
/// operator; raw Morse is never split.
pub(crate) fn split_operators(text: &str) -> Option<Vec<(Operator, &str)>> {
    if is_raw_morse(text) {
        return None;
    }

    let mut cuts: Vec<(usize, Operator)> = top_level(text, |c| c == '+' || c == '-')
        .into_iter()
        .filter_map(|i| match &text[i..i + 1] {
            "+" => Some((i, Operator::Add)),
            _ if is_subtraction(text, i) => Some((i, Operator::Subtract)),
            _ => None,
        })
        .collect();
    if cuts.is_empty() {
        return None;
    }
    cuts.push((text.len(), Operator::Add));

    let mut operands = Vec::with_capacity(cuts.len());
    let mut start = 0;
    let mut op = Operator::Add;
    for (at, next_op) in cuts {
        operands.push((op, text[start..at].trim()));
        start = at + 1;
        op = next_op;
    }
    Some(operands)
}

/// `D:a,b`, `S:f` or `Q:f` with nothing after the parameters
pub(crate) fn is_duration_token(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('d' | 'D' | 's' | 'S' | 'q' | 'Q'), Some(':'))
    ) && token.len() > 2
        && token[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

fn is_prefix_token(token: &str) -> bool {
    token == "~"
        || PREFIX_WORDS.iter().any(|w| w.eq_ignore_ascii_case(token))
        || is_duration_token(token)
}

/// Split on top-level whitespace and commas. The comma of a `D:a,b`
/// prefix stays inside its token.
fn raw_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let separator = depth == 0
            && (c.is_whitespace()
                || (c == ','
                    && !start.is_some_and(|s| {
                        let token = &text[s..i];
                        strip_ci(token, "d:").is_some() && !token.contains(',')
                    })));
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
        if separator {
            if let Some(s) = start.take() {
                segments.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        segments.push(&text[s..]);
    }
    segments
}

/// Top-level segments with every prefix token joined to the segment it
/// applies to: `rev E(3,8) P(3,0)` gives `["rev E(3,8)", "P(3,0)"]`.
pub(crate) fn segments(text: &str) -> Vec<String> {
    let mut grouped: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for token in raw_segments(text) {
        pending.push(token);
        if !is_prefix_token(token) {
            grouped.push(pending.join(" "));
            pending.clear();
        }
    }
    if !pending.is_empty() {
        grouped.push(pending.join(" "));
    }
    grouped
}

/// Strip `~`, prefix words and duration prefixes from the front
fn strip_prefixes(segment: &str) -> &str {
    let mut rest = segment.trim();
    loop {
        if let Some(r) = rest.strip_prefix('~') {
            rest = r.trim_start();
            continue;
        }
        let (head, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if !tail.is_empty() && is_prefix_token(head) {
            rest = tail.trim_start();
            continue;
        }
        return rest;
    }
}

/// Drop a trailing `@N`
fn strip_rotation(text: &str) -> &str {
    match rfind_top_level(text, '@') {
        Some(at) if text[at + 1..].trim().parse::<i64>().is_ok() => text[..at].trim_end(),
        _ => text,
    }
}

/// `xB>k` or `xW>k`: `x`, the uppercased generator letter and `k`. The
/// letter directly before `>` names the generator.
pub(crate) fn density_suffix(text: &str) -> Option<(&str, char, usize)> {
    let at = rfind_top_level(text, '>')?;
    let target = text[at + 1..].trim().parse::<usize>().ok()?;
    let head = text[..at].trim_end();
    let letter = head.chars().last()?.to_ascii_uppercase();
    if !matches!(letter, 'B' | 'W') {
        return None;
    }
    let base = head[..head.len() - 1].trim_end();
    (!base.is_empty()).then_some((base, letter, target))
}

fn strip_density(text: &str) -> &str {
    density_suffix(text).map_or(text, |(base, _, _)| base)
}

/// Drop a trailing `:N`
fn strip_step_suffix(text: &str) -> &str {
    match text.rsplit_once(':') {
        Some((body, steps)) if steps.trim().parse::<usize>().is_ok() => body,
        _ => text,
    }
}

fn strip_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    (text.len() > prefix.len() && head.eq_ignore_ascii_case(prefix)).then(|| &text[prefix.len()..])
}

fn all_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}

/// Shape of a numeric literal, without parsing its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericShape {
    Binary,
    Hex,
    Octal,
    Decimal,
}

/// Resolve the overlapping numeric notations. Bare strings of `0`/`1` are
/// binary; bare digits are decimal; bare hex digits need a letter.
pub(crate) fn numeric_shape(text: &str) -> Option<NumericShape> {
    let body = strip_step_suffix(text.trim());
    if let Some(rest) = strip_ci(body, "0x") {
        return all_digits(rest, 16).then_some(NumericShape::Hex);
    }
    if let Some(rest) = strip_ci(body, "0o").or_else(|| strip_ci(body, "o")) {
        return all_digits(rest, 8).then_some(NumericShape::Octal);
    }
    // `b` followed by digits is binary even when a digit is wrong, so the
    // decoder reports it instead of reading the text as hex
    if let Some(rest) = strip_ci(body, "0b").or_else(|| strip_ci(body, "b")) {
        if all_digits(rest, 10) {
            return Some(NumericShape::Binary);
        }
    }
    if let Some(rest) = strip_ci(body, "d") {
        if all_digits(rest, 10) {
            return Some(NumericShape::Decimal);
        }
    }
    if all_digits(body, 2) {
        Some(NumericShape::Binary)
    } else if all_digits(body, 10) {
        Some(NumericShape::Decimal)
    } else if all_digits(body, 16) {
        Some(NumericShape::Hex)
    } else {
        None
    }
}

/// `X(...)` for one of the generator letters
fn is_call_shape(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some('(')) if "pePErRbBwWdD".contains(letter)
    ) && text.ends_with(')')
}

/// Whether a stringing segment reads as a complete pattern expression
pub(crate) fn looks_like_pattern(segment: &str) -> bool {
    let body = strip_prefixes(segment);
    if body.is_empty() || !is_balanced(body) {
        return false;
    }
    let core = strip_rotation(strip_density(body));
    is_call_shape(core)
        || strip_ci(core, "m:").is_some()
        || is_raw_morse(core)
        || (core.starts_with('[') && core.contains(']'))
        || named_rhythm(core).is_some()
        || numeric_shape(core).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_check() {
        assert!(check_balanced("P(3,0)+[0,2]:4{100}").is_ok());
        assert_eq!(
            check_balanced("E(3,8").unwrap_err(),
            ParseError::UnbalancedDelimiters {
                input: "E(3,8".to_string(),
                delimiter: '('
            }
        );
        assert!(check_balanced("(]").is_err());
    }

    #[test]
    fn test_split_operators() {
        let ops = split_operators("P(3,0)+P(5,1)-P(2,0)").unwrap();
        assert_eq!(
            ops,
            vec![
                (Operator::Add, "P(3,0)"),
                (Operator::Add, "P(5,1)"),
                (Operator::Subtract, "P(2,0)")
            ]
        );
    }

    #[test]
    fn test_dash_that_is_not_subtraction() {
        assert!(split_operators("E(3,8,-1)").is_none());
        assert!(split_operators("E(3,8)@-2").is_none());
        assert!(split_operators(".-.- --").is_none());
        let ops = split_operators("E(3,8) - tri").unwrap();
        assert_eq!(ops[1], (Operator::Subtract, "tri"));
    }

    #[test]
    fn test_segments_group_prefixes() {
        assert_eq!(
            segments("rev E(3,8) P(3,0)"),
            vec!["rev E(3,8)".to_string(), "P(3,0)".to_string()]
        );
        assert_eq!(
            segments("D:1,2 E(3,8), [0,2]:4"),
            vec!["D:1,2 E(3,8)".to_string(), "[0,2]:4".to_string()]
        );
        assert_eq!(segments("E(3,8)"), vec!["E(3,8)".to_string()]);
    }

    #[test]
    fn test_numeric_shapes() {
        assert_eq!(numeric_shape("1001"), Some(NumericShape::Binary));
        assert_eq!(numeric_shape("b101:8"), Some(NumericShape::Binary));
        assert_eq!(numeric_shape("b102"), Some(NumericShape::Binary));
        assert_eq!(numeric_shape("bad"), Some(NumericShape::Hex));
        assert_eq!(numeric_shape("73"), Some(NumericShape::Decimal));
        assert_eq!(numeric_shape("d10"), Some(NumericShape::Decimal));
        assert_eq!(numeric_shape("0x92"), Some(NumericShape::Hex));
        assert_eq!(numeric_shape("FF"), Some(NumericShape::Hex));
        assert_eq!(numeric_shape("0o17"), Some(NumericShape::Octal));
        assert_eq!(numeric_shape("o7"), Some(NumericShape::Octal));
        assert_eq!(numeric_shape("hello"), None);
    }

    #[test]
    fn test_density_suffix() {
        assert_eq!(density_suffix("E(3,8)B>5"), Some(("E(3,8)", 'B', 5)));
        assert_eq!(density_suffix("tri w > 1"), Some(("tri", 'W', 1)));
        assert_eq!(density_suffix("E(3,8)@2b>1"), Some(("E(3,8)@2", 'B', 1)));
        assert_eq!(density_suffix("E(3,8)>5"), None);
        assert_eq!(density_suffix("B>5"), None);
        assert_eq!(density_suffix("E(3,8)B>x"), None);
    }

    #[test]
    fn test_classifier() {
        for seg in ["E(3,8)", "~P(5,0)@2", "rev tri", "M:SOS", "[0,3]:8", "0x49", "S:2 E(3,8)", "E(3,8)B>5"] {
            assert!(looks_like_pattern(seg), "{}", seg);
        }
        for seg in ["E(3,8", "WORLD", "", "hello"] {
            assert!(!looks_like_pattern(seg), "{}", seg);
        }
    }
}
