//! Pattern constructors driven by integer parameters.

pub mod euclidean;
pub mod meter;
pub mod morse;
pub mod polygon;
pub mod random;

pub use euclidean::{bjorklund, euclidean, euclidean_complement};
pub use meter::{barlow, dilcue, wolrab};
pub use morse::{decode_morse, morse_text};
pub use polygon::{polygon, polygon_at};
pub use random::{random_density, random_onsets};

use crate::error::Result;
use crate::types::Pattern;

/// Named rhythms beyond the polygon shorthands
pub fn named_rhythm(name: &str) -> Option<Result<Pattern>> {
    match name.to_ascii_lowercase().as_str() {
        "tresillo" => Some(euclidean(3, 8, 0)),
        "cinquillo" => Some(euclidean(5, 8, 0)),
        other => polygon::shorthand_vertices(other).map(|v| polygon(v as i64, 0, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_rhythms() {
        let tresillo = named_rhythm("Tresillo").unwrap().unwrap();
        assert_eq!(tresillo.to_binary_string(), "10010010");
        let hex = named_rhythm("hex").unwrap().unwrap();
        assert_eq!(hex.step_count(), 6);
        assert_eq!(hex.onset_count(), 6);
        assert!(named_rhythm("clave").is_none());
    }
}
