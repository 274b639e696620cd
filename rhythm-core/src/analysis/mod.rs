//! Mathematical analyses of a single pattern.
//!
//! Every analysis accepts any well-formed [`Pattern`], including one with no
//! onsets, and never fails.

pub mod balance;
pub mod indispensability;
pub mod prosody;
pub mod structure;
pub mod syncopation;

pub use balance::{balance, center_of_gravity, BalanceAnalysis, CenterOfGravity, Quality};
pub use indispensability::{indispensability, indispensability_profile, normalized_profile};
pub use prosody::{analyze_prosody, IntervalClass, ProsodyAnalysis};
pub use structure::{detect_euclidean, find_repetition, EuclideanMatch, Repetition};
pub use syncopation::{syncopation, SyncopationAnalysis, SyncopationLevel};

use crate::codec;
use crate::config::EngineConfig;
use crate::types::Pattern;

/// Everything known about one pattern
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisRecord {
    pub step_count: usize,
    pub onset_count: usize,
    pub density: f64,
    pub binary: String,
    pub hex: String,
    pub octal: String,
    pub decimal: Option<String>,
    pub onsets: Vec<usize>,
    pub balance: BalanceAnalysis,
    pub center_of_gravity: CenterOfGravity,
    pub repetition: Option<Repetition>,
    pub euclidean: Option<EuclideanMatch>,
    pub prosody: ProsodyAnalysis,
    pub syncopation: SyncopationAnalysis,
}

/// Runs every analysis with the numeric encodings in the configured bit order
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self { config: *config }
    }

    pub fn analyze(&self, pattern: &Pattern) -> AnalysisRecord {
        let reverse = self.config.reverse_for_rhythm && pattern.reads_reversed();
        let step_count = pattern.step_count();
        let onset_count = pattern.onset_count();

        AnalysisRecord {
            step_count,
            onset_count,
            density: onset_count as f64 / step_count as f64,
            binary: codec::encode_binary(pattern),
            hex: codec::encode_hex(pattern, reverse),
            octal: codec::encode_octal(pattern, reverse),
            decimal: codec::encode_decimal(pattern, reverse),
            onsets: pattern.onsets(),
            balance: balance(pattern),
            center_of_gravity: center_of_gravity(pattern),
            repetition: find_repetition(pattern),
            euclidean: detect_euclidean(pattern),
            prosody: analyze_prosody(pattern),
            syncopation: syncopation(pattern),
        }
    }
}

/// Analyze with the default configuration
pub fn analyze(pattern: &Pattern) -> AnalysisRecord {
    Analyzer::default().analyze(pattern)
}
