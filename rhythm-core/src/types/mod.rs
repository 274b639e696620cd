// rhythm-core/src/types/mod.rs

pub mod parsed;
pub mod pattern;

pub use parsed::{ParsedPattern, QuantizationReport};
pub use pattern::{LiteralFormat, MeterGenerator, Origin, Pattern, TransformKind};
