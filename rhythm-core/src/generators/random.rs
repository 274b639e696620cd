//! `R(k,n)` and `R(r,n)` patterns. The only generators that need a
//! [`RandomSource`].

use crate::error::{ParseError, Result};
use crate::random::RandomSource;
use crate::types::{Origin, Pattern};

/// `k` onsets on distinct random positions of an `n`-step cycle
pub fn random_onsets(onsets: i64, steps: i64, rng: &mut dyn RandomSource) -> Result<Pattern> {
    if steps <= 0 {
        return Err(ParseError::invalid_parameter("random step count", steps));
    }
    if onsets < 0 || onsets > steps {
        return Err(ParseError::invalid_parameter(
            "random onset count",
            format!("{} of {} steps", onsets, steps),
        ));
    }
    let (k, n) = (onsets as usize, steps as usize);

    // Fisher-Yates over the positions; the first k become onsets
    let mut positions: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.next_below(i + 1);
        positions.swap(i, j);
    }

    Pattern::from_onsets(
        &positions[..k],
        n,
        Origin::Random {
            onsets: k,
            steps: n,
        },
    )
}

/// `R(r,n)`: onset count drawn from a bell curve centred on `n/2`,
/// clamped to `1..=n-1`
pub fn random_density(steps: i64, rng: &mut dyn RandomSource) -> Result<Pattern> {
    if steps <= 0 {
        return Err(ParseError::invalid_parameter("random step count", steps));
    }
    let n = steps as f64;
    let std_dev = ((n - 2.0) / 6.0).max(0.0);
    let draw = rng.next_gaussian(n / 2.0, std_dev).round() as i64;
    let upper = (steps - 1).max(1);
    let onsets = draw.clamp(1, upper).min(steps);
    tracing::trace!(steps, onsets, "random onset count drawn");
    random_onsets(onsets, steps, rng)
}
