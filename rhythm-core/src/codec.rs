//! Lossless conversions between patterns and their textual encodings.
//!
//! Binary and onset-array encodings are read step by step. Hex, octal and
//! decimal encode a number whose bits are the steps; with
//! `reverse_for_rhythm` the first step is bit 0 (the binary string is
//! reversed before it is read as a number), otherwise the first step is the
//! most significant bit.
//!
//! A numeric literal implies a step count (4 per hex digit, 3 per octal
//! digit, the bit length for decimal). Encoders pad to whole digits and add an
//! explicit `:steps` suffix whenever the implied count would be wrong, so
//! `decode(encode(p)) == p` for every pattern.

use crate::error::{ParseError, Result};
use crate::types::{LiteralFormat, Origin, Pattern};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn literal(format: LiteralFormat) -> Origin {
    Origin::Literal { format }
}

/// Split a trailing `:steps` suffix off `text`
pub(crate) fn split_step_suffix(text: &str) -> Result<(&str, Option<usize>)> {
    match text.rsplit_once(':') {
        Some((body, steps)) => {
            let steps = steps.trim();
            let count: usize = steps
                .parse()
                .map_err(|_| ParseError::InvalidNumber(steps.to_string()))?;
            if count == 0 {
                return Err(ParseError::invalid_parameter("step count", 0));
            }
            Ok((body.trim(), Some(count)))
        }
        None => Ok((text, None)),
    }
}

/// Step count a literal asks for explicitly: its `:steps` suffix, or for an
/// onset array without one, the largest index plus one. Lets callers reject
/// oversized literals before their steps are allocated.
pub fn requested_steps(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some((_, steps)) = text.rsplit_once(':') {
        if let Ok(count) = steps.trim().parse::<u64>() {
            return Some(count);
        }
    }
    let inner = text.strip_prefix('[')?.split(']').next()?;
    inner
        .split(',')
        .filter_map(|item| item.trim().parse::<u64>().ok())
        .max()
        .map(|max| max.saturating_add(1))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Value bits in least-significant-first order
fn value_bits(pattern: &Pattern, reverse: bool) -> Vec<bool> {
    if reverse {
        pattern.steps().to_vec()
    } else {
        pattern.steps().iter().rev().copied().collect()
    }
}

/// Lay out least-significant-first value bits as `steps` steps
fn steps_from_value_bits(bits: &[bool], steps: usize, reverse: bool) -> Vec<bool> {
    let bit = |i: usize| bits.get(i).copied().unwrap_or(false);
    if reverse {
        (0..steps).map(bit).collect()
    } else {
        (0..steps).map(|i| bit(steps - 1 - i)).collect()
    }
}

fn with_steps_suffix(body: String, implied: usize, actual: usize) -> String {
    if implied == actual {
        body
    } else {
        format!("{}:{}", body, actual)
    }
}

// ---------------------------------------------------------------------------
// Binary

/// `'1'` for an onset, `'0'` for a rest, left to right
pub fn encode_binary(pattern: &Pattern) -> String {
    pattern.to_binary_string()
}

/// Strict binary decoding: an optional `b` or `0b` prefix, digits `0`/`1` only,
/// and an optional `:steps` suffix that pads with rests or truncates.
pub fn decode_binary(text: &str) -> Result<Pattern> {
    let trimmed = text.trim();
    let body = strip_prefix_ignore_case(trimmed, "0b")
        .or_else(|| strip_prefix_ignore_case(trimmed, "b"))
        .unwrap_or(trimmed);
    let (digits, explicit) = split_step_suffix(body)?;
    if digits.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut steps = Vec::with_capacity(digits.len());
    for c in digits.chars() {
        match c {
            '1' => steps.push(true),
            '0' => steps.push(false),
            other => {
                return Err(ParseError::InvalidBinaryDigit {
                    input: text.to_string(),
                    digit: other,
                })
            }
        }
    }

    if let Some(count) = explicit {
        steps.resize(count, false);
    }
    Pattern::new(steps, literal(LiteralFormat::Binary))
}

// ---------------------------------------------------------------------------
// Hex and octal (digit-wise, any length)

fn encode_radix(pattern: &Pattern, reverse: bool, bits_per_digit: usize, prefix: &str) -> String {
    let bits = value_bits(pattern, reverse);
    let digit_count = bits.len().div_ceil(bits_per_digit);

    let mut digits = String::with_capacity(digit_count);
    for d in (0..digit_count).rev() {
        let mut value = 0usize;
        for b in 0..bits_per_digit {
            if bits.get(d * bits_per_digit + b).copied().unwrap_or(false) {
                value |= 1 << b;
            }
        }
        digits.push(HEX_DIGITS[value] as char);
    }

    with_steps_suffix(
        format!("{}{}", prefix, digits),
        digit_count * bits_per_digit,
        pattern.step_count(),
    )
}

fn decode_radix(
    text: &str,
    reverse: bool,
    radix: u32,
    bits_per_digit: usize,
    prefixes: &[&str],
    format: LiteralFormat,
) -> Result<Pattern> {
    let trimmed = text.trim();
    let body = prefixes
        .iter()
        .find_map(|p| strip_prefix_ignore_case(trimmed, p))
        .unwrap_or(trimmed);
    let (digits, explicit) = split_step_suffix(body)?;
    if digits.is_empty() {
        return Err(ParseError::InvalidNumber(text.to_string()));
    }

    let mut bits = Vec::with_capacity(digits.len() * bits_per_digit);
    for c in digits.chars().rev() {
        let value = c
            .to_digit(radix)
            .ok_or_else(|| ParseError::InvalidNumber(text.to_string()))?;
        for b in 0..bits_per_digit {
            bits.push(value & (1 << b) != 0);
        }
    }

    let count = explicit.unwrap_or(digits.len() * bits_per_digit);
    Pattern::new(steps_from_value_bits(&bits, count, reverse), literal(format))
}

/// `0x`-prefixed hex, most significant digit first
pub fn encode_hex(pattern: &Pattern, reverse: bool) -> String {
    encode_radix(pattern, reverse, 4, "0x")
}

pub fn decode_hex(text: &str, reverse: bool) -> Result<Pattern> {
    decode_radix(text, reverse, 16, 4, &["0x"], LiteralFormat::Hex)
}

/// `0o`-prefixed octal, most significant digit first
pub fn encode_octal(pattern: &Pattern, reverse: bool) -> String {
    encode_radix(pattern, reverse, 3, "0o")
}

/// Accepts both the `0o` and the short `o` prefix
pub fn decode_octal(text: &str, reverse: bool) -> Result<Pattern> {
    decode_radix(text, reverse, 8, 3, &["0o", "o"], LiteralFormat::Octal)
}

// ---------------------------------------------------------------------------
// Decimal

/// Numeric value of the pattern, if it fits in 128 bits
pub fn pattern_value(pattern: &Pattern, reverse: bool) -> Option<u128> {
    let bits = value_bits(pattern, reverse);
    let mut value: u128 = 0;
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            if i >= 128 {
                return None;
            }
            value |= 1u128 << i;
        }
    }
    Some(value)
}

fn bit_length(value: u128) -> usize {
    ((128 - value.leading_zeros()) as usize).max(1)
}

/// `d`-prefixed decimal; `None` when the value needs more than 128 bits
pub fn encode_decimal(pattern: &Pattern, reverse: bool) -> Option<String> {
    let value = pattern_value(pattern, reverse)?;
    Some(with_steps_suffix(
        format!("d{}", value),
        bit_length(value),
        pattern.step_count(),
    ))
}

/// Decimal with an optional `d` prefix and `:steps` suffix
pub fn decode_decimal(text: &str, reverse: bool) -> Result<Pattern> {
    let trimmed = text.trim();
    let body = strip_prefix_ignore_case(trimmed, "d").unwrap_or(trimmed);
    let (digits, explicit) = split_step_suffix(body)?;
    let value: u128 = digits
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
    decimal_pattern(value, explicit, reverse)
}

/// Pattern for a decimal value, padded or truncated to `steps`
pub fn decimal_pattern(value: u128, steps: Option<usize>, reverse: bool) -> Result<Pattern> {
    let bits: Vec<bool> = (0..128).map(|i| value & (1u128 << i) != 0).collect();
    let count = steps.unwrap_or_else(|| bit_length(value));
    Pattern::new(
        steps_from_value_bits(&bits, count, reverse),
        literal(LiteralFormat::Decimal),
    )
}

// ---------------------------------------------------------------------------
// Onset arrays

/// `[i,j,k]`, with `:steps` when the count is not `max + 1`
pub fn encode_onsets(pattern: &Pattern) -> String {
    let onsets = pattern.onsets();
    let list: Vec<String> = onsets.iter().map(|i| i.to_string()).collect();
    let implied = onsets.last().map(|&last| last + 1).unwrap_or(0);
    with_steps_suffix(
        format!("[{}]", list.join(",")),
        implied,
        pattern.step_count(),
    )
}

/// `[i,j,k]` or `[i,j,k]:steps`. Duplicates are merged.
pub fn decode_onsets(text: &str) -> Result<Pattern> {
    let trimmed = text.trim();
    let close = trimmed
        .rfind(']')
        .ok_or_else(|| ParseError::UnbalancedDelimiters {
            input: text.to_string(),
            delimiter: '[',
        })?;
    let inner = trimmed
        .strip_prefix('[')
        .map(|rest| &rest[..close - 1])
        .ok_or_else(|| ParseError::unrecognized(text))?;

    let tail = trimmed[close + 1..].trim();
    let explicit = if tail.is_empty() {
        None
    } else {
        let (_, steps) = split_step_suffix(tail)?;
        if steps.is_none() {
            return Err(ParseError::unrecognized(text));
        }
        steps
    };

    let mut indices: Vec<i64> = Vec::new();
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let index: i64 = item
            .parse()
            .map_err(|_| ParseError::InvalidNumber(item.to_string()))?;
        indices.push(index);
    }

    let count = match explicit {
        Some(count) => count,
        None => match indices.iter().max() {
            Some(&max) if max >= 0 => usize::try_from(max)
                .ok()
                .and_then(|max| max.checked_add(1))
                .ok_or_else(|| ParseError::step_overflow("onset array step count"))?,
            Some(&negative) => {
                return Err(ParseError::OnsetOutOfRange {
                    index: negative,
                    steps: 0,
                })
            }
            None => return Err(ParseError::invalid_parameter("empty onset list", text)),
        },
    };

    let mut steps = vec![false; count];
    for index in indices {
        if index < 0 || index as usize >= count {
            return Err(ParseError::OnsetOutOfRange {
                index,
                steps: count,
            });
        }
        steps[index as usize] = true;
    }
    Pattern::new(steps, literal(LiteralFormat::Onsets))
}

// ---------------------------------------------------------------------------
// Format dispatch

/// Encode in the given format. Morse has no general encoding and decimal
/// stops at 128 steps, both return `None`.
pub fn encode(pattern: &Pattern, format: LiteralFormat, reverse: bool) -> Option<String> {
    match format {
        LiteralFormat::Binary => Some(encode_binary(pattern)),
        LiteralFormat::Hex => Some(encode_hex(pattern, reverse)),
        LiteralFormat::Octal => Some(encode_octal(pattern, reverse)),
        LiteralFormat::Decimal => encode_decimal(pattern, reverse),
        LiteralFormat::Onsets => Some(encode_onsets(pattern)),
        LiteralFormat::Morse => None,
    }
}

/// Decode text written in the given format
pub fn decode(text: &str, format: LiteralFormat, reverse: bool) -> Result<Pattern> {
    match format {
        LiteralFormat::Binary => decode_binary(text),
        LiteralFormat::Hex => decode_hex(text, reverse),
        LiteralFormat::Octal => decode_octal(text, reverse),
        LiteralFormat::Decimal => decode_decimal(text, reverse),
        LiteralFormat::Onsets => decode_onsets(text),
        LiteralFormat::Morse => crate::generators::morse::decode_morse(text),
    }
}
