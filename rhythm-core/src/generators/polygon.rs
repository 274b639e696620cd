//! Regular polygons inscribed in the rhythm circle.

use crate::error::{ParseError, Result};
use crate::types::{Origin, Pattern};
use num_rational::Ratio;

/// Named polygon shorthands and their vertex counts
pub const SHORTHAND_POLYGONS: &[(&str, usize)] = &[
    ("tri", 3),
    ("square", 4),
    ("pent", 5),
    ("hex", 6),
    ("hept", 7),
    ("oct", 8),
];

fn check_params(vertices: i64, expansion: i64) -> Result<(usize, usize)> {
    if vertices < 2 || expansion < 1 {
        return Err(ParseError::InvalidPolygonParams {
            vertices,
            expansion,
        });
    }
    Ok((vertices as usize, expansion as usize))
}

/// Native length `vertices × expansion` of `P(vertices, _, expansion)`
pub fn polygon_length(vertices: i64, expansion: i64) -> Result<usize> {
    let (v, e) = check_params(vertices, expansion)?;
    v.checked_mul(e)
        .ok_or_else(|| ParseError::step_overflow("polygon step count"))
}

/// Vertex positions of the polygon laid out on a circle of `len` steps.
///
/// The vertex angles are those of `P(vertices, offset, expansion)`; each one
/// lands on the nearest step, halves rounding away from zero.
pub fn vertex_positions(
    vertices: usize,
    offset: i64,
    expansion: usize,
    len: usize,
) -> Result<Vec<usize>> {
    let native = polygon_length(vertices as i64, expansion as i64)? as i128;
    let len_i = len as i128;
    let mut positions = Vec::with_capacity(vertices);
    for v in 0..vertices as i128 {
        let native_pos = v * expansion as i128 + offset as i128;
        let scaled = native_pos
            .checked_mul(len_i)
            .ok_or_else(|| ParseError::step_overflow("polygon vertex position"))?;
        let step = Ratio::new(scaled, native).round().to_integer();
        positions.push(step.rem_euclid(len_i) as usize);
    }
    positions.sort_unstable();
    positions.dedup();
    Ok(positions)
}

/// `P(vertices, offset, expansion)` on `vertices × expansion` steps
pub fn polygon(vertices: i64, offset: i64, expansion: i64) -> Result<Pattern> {
    let len = polygon_length(vertices, expansion)?;
    polygon_at(vertices as usize, offset, expansion as usize, len)
}

/// The same polygon re-derived at another length, used when extending
pub fn polygon_at(vertices: usize, offset: i64, expansion: usize, len: usize) -> Result<Pattern> {
    let (v, e) = check_params(vertices as i64, expansion as i64)?;
    if len == 0 {
        return Err(ParseError::invalid_parameter("polygon length", 0));
    }
    Pattern::from_onsets(
        &vertex_positions(v, offset, e, len)?,
        len,
        Origin::Polygon {
            vertices: v,
            offset,
            expansion: e,
        },
    )
}

/// Vertex count for a shorthand name such as `pent`
pub fn shorthand_vertices(name: &str) -> Option<usize> {
    SHORTHAND_POLYGONS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_with_offset() {
        let p = polygon(3, 1, 1).unwrap();
        assert_eq!(p.step_count(), 3);
        assert_eq!(p.to_binary_string(), "111");
        let p = polygon(3, 1, 2).unwrap();
        assert_eq!(p.to_binary_string(), "010101");
    }

    #[test]
    fn test_negative_offset_wraps() {
        let p = polygon(4, -1, 2).unwrap();
        assert_eq!(p.onsets(), vec![1, 3, 5, 7]);
        let p = polygon(2, -1, 3).unwrap();
        assert_eq!(p.onsets(), vec![2, 5]);
    }

    #[test]
    fn test_re_derived_at_multiple_length() {
        let p = polygon_at(3, 1, 1, 15).unwrap();
        assert_eq!(p.onsets(), vec![0, 5, 10]);
        let p = polygon_at(5, 1, 1, 15).unwrap();
        assert_eq!(p.onsets(), vec![0, 3, 6, 9, 12]);
    }

    #[test]
    fn test_rounding_at_non_multiple_length() {
        // 3 vertices on 8 steps: 0, 8/3 -> 3, 16/3 -> 5
        assert_eq!(vertex_positions(3, 0, 1, 8).unwrap(), vec![0, 3, 5]);
        // 2 vertices on 3 steps: 1.5 rounds away from zero
        assert_eq!(vertex_positions(2, 0, 1, 3).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_invalid_params() {
        assert_eq!(
            polygon(1, 0, 1).unwrap_err(),
            ParseError::InvalidPolygonParams {
                vertices: 1,
                expansion: 1
            }
        );
        assert!(polygon(3, 0, 0).is_err());
    }

    #[test]
    fn test_oversized_parameters_are_errors() {
        assert_eq!(
            polygon_length(4, 4_611_686_018_427_387_904).unwrap_err(),
            ParseError::step_overflow("polygon step count")
        );
        assert!(polygon(4, 0, 4_611_686_018_427_387_904).is_err());
        // extreme offsets stay exact
        let p = polygon_at(3, i64::MAX, 1, 6).unwrap();
        assert_eq!(p.onset_count(), 3);
    }

    #[test]
    fn test_shorthands() {
        assert_eq!(shorthand_vertices("PENT"), Some(5));
        assert_eq!(shorthand_vertices("hex"), Some(6));
        assert_eq!(shorthand_vertices("nonagon"), None);
    }
}
