//! Generators that pick onsets by metric weight: `B(k,n)`, `W(k,n)`, `D(k,n)`.

use super::euclidean::bjorklund;
use crate::analysis::indispensability::ranked_positions;
use crate::error::{ParseError, Result};
use crate::types::{MeterGenerator, Origin, Pattern};

fn check_params(onsets: i64, steps: i64) -> Result<(usize, usize)> {
    if steps <= 0 {
        return Err(ParseError::invalid_parameter("step count", steps));
    }
    if onsets < 0 || onsets > steps {
        return Err(ParseError::invalid_parameter(
            "onset count",
            format!("{} of {} steps", onsets, steps),
        ));
    }
    Ok((onsets as usize, steps as usize))
}

/// Positions a generator switches on, in the order it picks them
pub(crate) fn pick_order(generator: MeterGenerator, steps: usize) -> Vec<usize> {
    let ranked = ranked_positions(steps);
    match generator {
        MeterGenerator::Wolrab => {
            // downbeat first, then from the weakest position up
            let mut order = vec![0];
            order.extend(ranked.into_iter().rev().filter(|&p| p != 0));
            order
        }
        _ => ranked,
    }
}

/// Run one of the weight-based generators
pub fn generate(generator: MeterGenerator, onsets: i64, steps: i64) -> Result<Pattern> {
    let (k, n) = check_params(onsets, steps)?;
    let origin = Origin::Generated {
        generator,
        onsets: k,
        steps: n,
    };

    match generator {
        MeterGenerator::Dilcue => {
            let inverted = bjorklund(n - k, n).into_iter().map(|s| !s).collect();
            Pattern::new(inverted, origin)
        }
        _ => {
            let order = pick_order(generator, n);
            Pattern::from_onsets(&order[..k], n, origin)
        }
    }
}

/// `B(k,n)`: the `k` most indispensable positions
pub fn barlow(onsets: i64, steps: i64) -> Result<Pattern> {
    generate(MeterGenerator::Barlow, onsets, steps)
}

/// `W(k,n)`: the downbeat plus the `k-1` least indispensable positions
pub fn wolrab(onsets: i64, steps: i64) -> Result<Pattern> {
    generate(MeterGenerator::Wolrab, onsets, steps)
}

/// `D(k,n)`: the rests of `E(n-k, n)` become onsets
pub fn dilcue(onsets: i64, steps: i64) -> Result<Pattern> {
    generate(MeterGenerator::Dilcue, onsets, steps)
}
