//! Engine configuration
//!
//! A plain value built once at startup and handed to the parser and the
//! analyzer. Nothing in the engine reads configuration from global state.

use crate::error::{ParseError, Result};

/// Upper bound accepted by the `;N` quantization suffix.
pub const DEFAULT_MAX_QUANTIZE_STEPS: usize = 128;

/// Largest pattern the parser will build.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Immutable settings for parsing and analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Read hex/octal/decimal values with the first step as the least
    /// significant bit (downbeat = bit 0). `false` selects the standard
    /// left-to-right reading.
    pub reverse_for_rhythm: bool,
    /// Largest step count accepted by quantization.
    pub max_quantize_steps: usize,
    /// Largest step count any parsed pattern may have, checked before the
    /// steps are allocated.
    pub max_steps: usize,
    /// Seed for `R(...)` patterns. `None` draws from OS entropy.
    pub default_random_seed: Option<u64>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            reverse_for_rhythm: true,
            max_quantize_steps: DEFAULT_MAX_QUANTIZE_STEPS,
            max_steps: DEFAULT_MAX_STEPS,
            default_random_seed: None,
        }
    }

    /// Switch between rhythmic (reversed) and standard bit order
    pub fn with_reverse_for_rhythm(mut self, reverse: bool) -> Self {
        self.reverse_for_rhythm = reverse;
        self
    }

    pub fn with_max_quantize_steps(mut self, max: usize) -> Self {
        self.max_quantize_steps = max.max(1);
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max.max(1);
        self
    }

    /// `steps` as a `usize` when it is within [`max_steps`](Self::max_steps)
    pub fn check_step_count(&self, context: &str, steps: u64) -> Result<usize> {
        match usize::try_from(steps) {
            Ok(n) if n <= self.max_steps => Ok(n),
            _ => Err(ParseError::too_many_steps(context, steps, self.max_steps)),
        }
    }

    /// Make random patterns reproducible
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.default_random_seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
