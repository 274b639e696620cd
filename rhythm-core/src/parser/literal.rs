//! Literal patterns: generator calls, Morse, onset arrays, shorthand names
//! and numeric encodings.

use super::scanner::{numeric_shape, NumericShape};
use super::Parser;
use crate::codec;
use crate::error::{ParseError, Result};
use crate::generators::{self, morse};
use crate::types::{MeterGenerator, Pattern};
use std::ops::RangeInclusive;

/// Comma-separated integer arguments
pub(crate) fn parse_args(inner: &str) -> Result<Vec<i64>> {
    inner
        .split(',')
        .map(str::trim)
        .map(|arg| {
            arg.parse::<i64>()
                .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
        })
        .collect()
}

/// `X(args)` where `X` is a single letter: the letter and the raw arguments
fn call_parts(text: &str) -> Option<(char, &str)> {
    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let inner = chars.as_str().strip_prefix('(')?.strip_suffix(')')?;
    Some((letter, inner))
}

fn expect_args(call: &str, args: &[i64], allowed: RangeInclusive<usize>) -> Result<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(ParseError::invalid_parameter(
            format!("{} arguments", call),
            args.len(),
        ))
    }
}

impl Parser {
    /// Reject a generator's step argument above the ceiling. Non-positive
    /// counts are left to the generator, which reports its own error.
    fn check_generator_steps(&self, call: char, steps: i64) -> Result<()> {
        if steps > 0 {
            self.config
                .check_step_count(&format!("{} step count", call), steps.unsigned_abs())?;
        }
        Ok(())
    }

    /// Reject a literal whose stated length is above the ceiling
    fn check_literal_steps(&self, text: &str) -> Result<()> {
        if let Some(steps) = codec::requested_steps(text) {
            self.config.check_step_count("literal step count", steps)?;
        }
        Ok(())
    }

    /// Generator calls, Morse, onset arrays and named rhythms, tried in
    /// that order. `Ok(None)` when the text has none of these shapes.
    pub(super) fn parse_structured(&mut self, text: &str) -> Result<Option<Pattern>> {
        if let Some((letter, inner)) = call_parts(text) {
            let pattern = match letter {
                'P' => {
                    let args = parse_args(inner)?;
                    expect_args("P", &args, 2..=3)?;
                    let expansion = args.get(2).copied().unwrap_or(1);
                    let len = generators::polygon::polygon_length(args[0], expansion)?;
                    self.config.check_step_count("P step count", len as u64)?;
                    generators::polygon(args[0], args[1], expansion)?
                }
                'E' => {
                    let args = parse_args(inner)?;
                    expect_args("E", &args, 2..=3)?;
                    self.check_generator_steps('E', args[1])?;
                    generators::euclidean(args[0], args[1], args.get(2).copied().unwrap_or(0))?
                }
                'R' => self.parse_random(inner)?,
                'B' | 'W' | 'D' => {
                    let args = parse_args(inner)?;
                    expect_args(&letter.to_string(), &args, 2..=2)?;
                    self.check_generator_steps(letter, args[1])?;
                    let generator = match letter {
                        'B' => MeterGenerator::Barlow,
                        'W' => MeterGenerator::Wolrab,
                        _ => MeterGenerator::Dilcue,
                    };
                    generators::meter::generate(generator, args[0], args[1])?
                }
                _ => return Ok(None),
            };
            tracing::debug!(rule = "generator", input = text, "resolved");
            return Ok(Some(pattern));
        }

        let morse_message = text
            .get(..2)
            .filter(|tag| tag.eq_ignore_ascii_case("m:"))
            .and_then(|_| text.get(2..));
        if let Some(message) = morse_message {
            tracing::debug!(rule = "morse text", input = text, "resolved");
            return morse::morse_text(message).map(Some);
        }
        if morse::is_raw_morse(text) {
            tracing::debug!(rule = "raw morse", input = text, "resolved");
            return morse::decode_morse(text).map(Some);
        }
        if text.starts_with('[') {
            tracing::debug!(rule = "onset array", input = text, "resolved");
            self.check_literal_steps(text)?;
            return codec::decode_onsets(text).map(Some);
        }
        if let Some(named) = generators::named_rhythm(text) {
            tracing::debug!(rule = "shorthand", input = text, "resolved");
            return named.map(Some);
        }
        Ok(None)
    }

    /// `R(k,n)` or `R(r,n)`
    fn parse_random(&mut self, inner: &str) -> Result<Pattern> {
        let (first, steps) = inner
            .split_once(',')
            .ok_or_else(|| ParseError::invalid_parameter("R arguments", inner))?;
        let steps: i64 = steps
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidNumber(steps.trim().to_string()))?;
        self.check_generator_steps('R', steps)?;
        let first = first.trim();
        if first.eq_ignore_ascii_case("r") {
            generators::random_density(steps, self.rng.as_mut())
        } else {
            let onsets: i64 = first
                .parse()
                .map_err(|_| ParseError::InvalidNumber(first.to_string()))?;
            generators::random_onsets(onsets, steps, self.rng.as_mut())
        }
    }

    /// Binary, decimal, octal and hex literals
    pub(super) fn parse_numeric(&self, text: &str) -> Result<Option<Pattern>> {
        let reverse = self.config.reverse_for_rhythm;
        let shape = numeric_shape(text);
        if shape.is_some() {
            self.check_literal_steps(text)?;
        }
        let pattern = match shape {
            Some(NumericShape::Binary) => codec::decode_binary(text)?,
            Some(NumericShape::Decimal) => codec::decode_decimal(text, reverse)?,
            Some(NumericShape::Octal) => codec::decode_octal(text, reverse)?,
            Some(NumericShape::Hex) => codec::decode_hex(text, reverse)?,
            None => return Ok(None),
        };
        tracing::debug!(rule = "numeric", input = text, "resolved");
        Ok(Some(pattern))
    }
}
