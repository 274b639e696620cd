//! # Rhythm Core
//!
//! WASM-compatible core library for rhythmic onset patterns.
//! Parses the pattern notation, generates patterns from parameters,
//! transforms and combines them, and analyzes their structure. No I/O.
//!
//! ## Features
//!
//! - **serde**: Enable JSON serialization for web interop
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//! - **colored**: Enable colored terminal output (disabled in WASM)
//!
//! ## Example
//!
//! ```
//! use rhythm_core::{analyze, format_compact, EngineConfig, Parser};
//!
//! let mut parser = Parser::new(&EngineConfig::default());
//! let parsed = parser.parse("E(3,8)").unwrap();
//! assert_eq!(parsed.pattern().to_binary_string(), "10010010");
//! assert_eq!(analyze(parsed.pattern()).prosody.sequence, "LLS");
//! println!("{}", format_compact(parsed.pattern()));
//! ```

pub mod analysis;
pub mod codec;
pub mod combiner;
pub mod config;
pub mod error;
pub mod format;
pub mod generators;
pub mod number_theory;
pub mod parser;
pub mod random;
pub mod transform;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use analysis::{analyze, AnalysisRecord, Analyzer};
pub use combiner::combine;
pub use config::EngineConfig;
pub use error::{ParseError, Result};
pub use format::{format_compact, format_compact_with};
pub use parser::{parse, Parser};
pub use random::{RandomSource, SeededRandom};
pub use transform::transform;
pub use types::{LiteralFormat, Origin, ParsedPattern, Pattern, QuantizationReport, TransformKind};

pub use wasm::{summarize, PatternSummary};
