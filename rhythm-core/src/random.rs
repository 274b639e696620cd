//! Injectable randomness for `R(...)` patterns.
//!
//! The parser owns a boxed [`RandomSource`]; every other part of the engine
//! is deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random draws used by the random-pattern generator.
pub trait RandomSource: Send {
    /// Uniform integer in `0..bound`. `bound` is never zero.
    fn next_below(&mut self, bound: usize) -> usize;

    /// Sample from a normal distribution.
    fn next_gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// [`RandomSource`] backed by `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible stream for a given seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn from_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound.max(1))
    }

    fn next_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // Box-Muller; rand 0.8 keeps Normal in rand_distr
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std_dev
    }
}
