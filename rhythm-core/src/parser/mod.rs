// rhythm-core/src/parser/mod.rs

//! Parser for the pattern notation.
//!
//! The notations overlap lexically, so every input is resolved by one fixed
//! precedence, outermost first:
//!
//! | rule          | shape                                         |
//! |---------------|-----------------------------------------------|
//! | naming        | `name=expr`                                   |
//! | accent        | `expr{accent}`                                |
//! | quantization  | `expr;N`, `expr;-N`                           |
//! | combination   | `A+B-C`                                       |
//! | stringing     | `A B C`, `A,B,C`                              |
//! | prefixes      | `~x`, `inv x`, `rev x`, `comp x`              |
//! | durations     | `D:a,b x`, `S:f x`, `Q:f x`                   |
//! | density       | `xB>k`, `xW>k`                                |
//! | rotation      | `x@N`                                         |
//! | structured    | `P(..)`, `E(..)`, `R(..)`, `B/W/D(..)`, `M:..`, Morse, `[..]`, names |
//! | numeric       | binary, decimal, octal, hex                   |

mod literal;
mod scanner;


use crate::combiner;
use crate::config::EngineConfig;
use crate::error::{ParseError, Result};
use crate::generators::morse::is_raw_morse;
use crate::random::{RandomSource, SeededRandom};
use crate::transform;
use crate::types::{Origin, ParsedPattern, Pattern};
use scanner::{
    check_balanced, density_suffix, find_top_level, is_duration_token, looks_like_pattern,
    matching_close, rfind_top_level, segments, split_operators, Operator, PREFIX_WORDS,
};

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `inv x`, `rev x`, `comp x`: the lowercased word and `x`
fn prefix_word(text: &str) -> Option<(String, &str)> {
    let (head, rest) = text.split_once(char::is_whitespace)?;
    let word = head.to_ascii_lowercase();
    (PREFIX_WORDS.contains(&word.as_str()) && !rest.trim().is_empty()).then_some((word, rest))
}

/// `D:a,b x`, `S:f x`, `Q:f x`: the prefix letter, its parameters and `x`
fn duration_prefix(text: &str) -> Option<(char, &str, &str)> {
    let (head, rest) = text.split_once(char::is_whitespace)?;
    if !is_duration_token(head) || rest.trim().is_empty() {
        return None;
    }
    let letter = head.chars().next()?.to_ascii_uppercase();
    Some((letter, &head[2..], rest))
}

fn parse_factor(text: &str) -> Result<f64> {
    let factor: f64 = text
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ParseError::invalid_parameter("scale factor", text));
    }
    Ok(factor)
}

fn scaled_length(steps: usize, factor: f64) -> usize {
    ((steps as f64 * factor).round() as usize).max(1)
}

/// Turns pattern notation into [`ParsedPattern`]s.
///
/// Owns the random source used by `R(...)`; everything else it does is
/// deterministic.
pub struct Parser {
    config: EngineConfig,
    rng: Box<dyn RandomSource>,
}

impl Parser {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: *config,
            rng: Box::new(SeededRandom::from_option(config.default_random_seed)),
        }
    }

    /// Reseed the random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(SeededRandom::from_seed(seed));
        self
    }

    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration, keeping the random stream where it is
    pub fn set_config(&mut self, config: &EngineConfig) {
        self.config = *config;
    }

    /// Parse one pattern expression
    pub fn parse(&mut self, text: &str) -> Result<ParsedPattern> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        check_balanced(text)?;
        self.parse_named(text)
    }

    fn parse_named(&mut self, text: &str) -> Result<ParsedPattern> {
        let Some(at) = find_top_level(text, '=') else {
            return self.parse_accented(text);
        };

        let name = text[..at].trim();
        if !is_identifier(name) {
            return Err(ParseError::invalid_parameter("pattern name", name));
        }
        let body = text[at + 1..].trim();
        if body.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        tracing::debug!(rule = "naming", name, "resolved");
        Ok(ParsedPattern::Named {
            name: name.to_string(),
            inner: Box::new(self.parse_accented(body)?),
        })
    }

    fn parse_accented(&mut self, text: &str) -> Result<ParsedPattern> {
        let Some(open) = find_top_level(text, '{') else {
            return self.parse_quantized(text);
        };
        let close = matching_close(text, open).ok_or_else(|| ParseError::UnbalancedDelimiters {
            input: text.to_string(),
            delimiter: '{',
        })?;

        let accent_text = text[open + 1..close].trim();
        let base = format!("{}{}", &text[..open], &text[close + 1..]);
        let base = base.trim();
        if accent_text.is_empty() || base.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        tracing::debug!(rule = "accent", accent = accent_text, "resolved");
        let accent = self.parse_quantized(accent_text)?.into_pattern();
        Ok(ParsedPattern::Accented {
            inner: Box::new(self.parse_accented(base)?),
            accent,
        })
    }

    fn parse_quantized(&mut self, text: &str) -> Result<ParsedPattern> {
        let Some(at) = rfind_top_level(text, ';') else {
            return self.parse_combination(text);
        };

        let body = text[..at].trim();
        let arg = text[at + 1..].trim();
        let signed: i64 = arg
            .parse()
            .map_err(|_| ParseError::InvalidNumber(arg.to_string()))?;
        if body.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let source = self.parse_combination(body)?;
        let (pattern, report) = transform::quantize(
            source.pattern(),
            signed.unsigned_abs() as usize,
            signed >= 0,
            self.config.max_quantize_steps,
        )?;
        Ok(ParsedPattern::Quantized {
            pattern,
            source: Box::new(source),
            report,
        })
    }

    fn parse_combination(&mut self, text: &str) -> Result<ParsedPattern> {
        let Some(operands) = split_operators(text) else {
            return self.parse_expression(text);
        };

        let mut added = Vec::new();
        let mut subtracted = Vec::new();
        for (op, operand) in operands {
            if operand.is_empty() {
                return Err(ParseError::EmptyInput);
            }
            let pattern = self.parse_expression(operand)?.into_pattern();
            match op {
                Operator::Add => added.push(pattern),
                Operator::Subtract => subtracted.push(pattern),
            }
        }

        tracing::debug!(
            rule = "combination",
            added = added.len(),
            subtracted = subtracted.len(),
            "resolved"
        );
        let pattern =
            combiner::combine_and_subtract(&added, &subtracted, self.config.max_steps)?;
        Ok(ParsedPattern::Combined {
            pattern,
            added,
            subtracted,
        })
    }

    /// A stringed sequence when every segment looks like a pattern of its
    /// own, otherwise a single pattern
    fn parse_expression(&mut self, text: &str) -> Result<ParsedPattern> {
        if !is_raw_morse(text) {
            let segments = segments(text);
            if segments.len() >= 2 && segments.iter().all(|s| looks_like_pattern(s)) {
                return self.parse_stringed(&segments);
            }
        }
        Ok(ParsedPattern::Single(self.parse_single(text)?))
    }

    fn parse_stringed(&mut self, segments: &[String]) -> Result<ParsedPattern> {
        tracing::debug!(rule = "stringing", parts = segments.len(), "resolved");
        let parts = segments
            .iter()
            .map(|segment| self.parse_single(segment))
            .collect::<Result<Vec<_>>>()?;
        let total: u64 = parts.iter().map(|p| p.step_count() as u64).sum();
        let total = self.config.check_step_count("stringed step count", total)?;

        let mut steps = Vec::with_capacity(total);
        let mut dividers = Vec::with_capacity(parts.len() - 1);
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                dividers.push(steps.len());
            }
            steps.extend_from_slice(part.steps());
        }

        let pattern = Pattern::new(
            steps,
            Origin::Stringed {
                parts: parts.iter().map(|p| p.origin().clone()).collect(),
            },
        )?;
        Ok(ParsedPattern::Stringed {
            pattern,
            parts,
            dividers,
        })
    }

    fn parse_single(&mut self, text: &str) -> Result<Pattern> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some(rest) = text.strip_prefix('~') {
            return Ok(transform::invert(&self.parse_single(rest)?));
        }
        if let Some((word, rest)) = prefix_word(text) {
            tracing::debug!(rule = "prefix", word = word.as_str(), "resolved");
            let base = self.parse_single(rest)?;
            return match word.as_str() {
                "inv" => Ok(transform::invert(&base)),
                "rev" => Ok(transform::retrograde(&base)),
                _ => transform::complement(&base),
            };
        }
        if let Some((letter, params, rest)) = duration_prefix(text) {
            tracing::debug!(rule = "duration prefix", params, "resolved");
            let base = self.parse_single(rest)?;
            return self.apply_duration_prefix(letter, params, &base);
        }
        if let Some((base, letter, target)) = density_suffix(text) {
            tracing::debug!(rule = "density", target, "resolved");
            let base = self.parse_single(base)?;
            return match letter {
                'W' => transform::wolrab_to(&base, target),
                _ => transform::barlow_to(&base, target),
            };
        }
        if let Some(at) = rfind_top_level(text, '@') {
            if let Ok(r) = text[at + 1..].trim().parse::<i64>() {
                tracing::debug!(rule = "rotation", by = r, "resolved");
                let base = self.parse_single(&text[..at])?;
                return Ok(transform::rotate(&base, r));
            }
        }

        if let Some(pattern) = self.parse_structured(text)? {
            return Ok(pattern);
        }
        if let Some(pattern) = self.parse_numeric(text)? {
            return Ok(pattern);
        }
        Err(ParseError::unrecognized(text))
    }

    fn apply_duration_prefix(&self, letter: char, params: &str, base: &Pattern) -> Result<Pattern> {
        let n = base.step_count();
        match letter {
            'D' => {
                let (short, long) = params
                    .split_once(',')
                    .ok_or_else(|| ParseError::invalid_parameter("durations", params))?;
                let parse = |s: &str| {
                    s.trim()
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidNumber(s.to_string()))
                };
                let (short, long) = (parse(short)?, parse(long)?);
                let len = transform::durations_length(base, short, long)?;
                self.config.check_step_count("durations step count", len as u64)?;
                transform::with_durations(base, short, long)
            }
            'S' => {
                let factor = parse_factor(params)?;
                if factor >= 1.0 {
                    let factor = factor.round();
                    let len = n as f64 * factor;
                    if len > self.config.max_steps as f64 {
                        return Err(ParseError::too_many_steps(
                            "stretched step count",
                            len,
                            self.config.max_steps,
                        ));
                    }
                    transform::stretch(base, factor as usize)
                } else {
                    transform::squeeze(base, scaled_length(n, factor))
                }
            }
            _ => {
                let factor = parse_factor(params)?;
                let steps = if factor >= 1.0 {
                    scaled_length(n, 1.0 / factor)
                } else {
                    scaled_length(n, factor)
                };
                transform::squeeze(base, steps)
            }
        }
    }
}

/// Parse with the default configuration and an entropy-seeded random source
pub fn parse(text: &str) -> Result<ParsedPattern> {
    Parser::new(&EngineConfig::default()).parse(text)
}
