//! Integer primitives used by the combiner and the meter analysis.
//!
//! Everything here works on `i64`/`u64`. [`lcm`] reports overflow as `None`
//! and [`lcm_many`] turns it into an error.

use crate::error::{ParseError, Result};

/// Greatest common divisor of the absolute values. `gcd(0, 0) == 0`.
pub fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm_u64(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    let (mut x, mut y) = (a, b);
    while y != 0 {
        (x, y) = (y, x % y);
    }
    (a / x).checked_mul(b)
}

/// Least common multiple, `None` when it does not fit a `u64`.
/// Zero if either input is zero.
pub fn lcm(a: i64, b: i64) -> Option<u64> {
    lcm_u64(a.unsigned_abs(), b.unsigned_abs())
}

/// Left fold of [`lcm`] over every non-zero entry.
///
/// Returns `0` when all entries are zero. Fails with
/// [`ParseError::EmptyInput`] when there is nothing to fold, and with
/// `InvalidParameter` when the multiple overflows.
pub fn lcm_many(values: &[i64]) -> Result<u64> {
    if values.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut acc: Option<u64> = None;
    for &v in values.iter().filter(|&&v| v != 0) {
        acc = Some(match acc {
            None => v.unsigned_abs(),
            Some(current) => lcm_u64(current, v.unsigned_abs())
                .ok_or_else(|| ParseError::step_overflow("combined step count"))?,
        });
    }
    Ok(acc.unwrap_or(0))
}

/// Trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Prime factors in ascending order, with multiplicity.
///
/// `prime_factors(12) == [2, 2, 3]`. Zero and one have no factors.
pub fn prime_factors(n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }

    let mut n = n;
    let mut d = 2;
    while d * d <= n {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += if d == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Distinct primes of `n` paired with their multiplicity, ascending.
pub fn prime_powers(n: u64) -> Vec<(u64, u32)> {
    let mut powers: Vec<(u64, u32)> = Vec::new();
    for p in prime_factors(n) {
        match powers.last_mut() {
            Some((last, count)) if *last == p => *count += 1,
            _ => powers.push((p, 1)),
        }
    }
    powers
}

/// Divisors of `n` in ascending order.
pub fn divisors(n: usize) -> Vec<usize> {
    (1..=n).filter(|d| n % d == 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_basics() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn test_lcm_basics() {
        assert_eq!(lcm(3, 5), Some(15));
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(-4, 6), Some(12));
        assert_eq!(lcm(0, 6), Some(0));
        assert_eq!(lcm(i64::MAX, i64::MAX - 1), None);
    }

    #[test]
    fn test_lcm_many() {
        assert_eq!(lcm_many(&[3, 5, 2]).unwrap(), 30);
        assert_eq!(lcm_many(&[0, 4, 0, 6]).unwrap(), 12);
        assert_eq!(lcm_many(&[0, 0]).unwrap(), 0);
        assert_eq!(lcm_many(&[]), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_lcm_many_overflow_is_an_error() {
        let primes = [13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61];
        assert_eq!(
            lcm_many(&primes).unwrap_err(),
            ParseError::step_overflow("combined step count")
        );
    }

    #[test]
    fn test_lcm_many_matches_pairwise_fold() {
        for (a, b, c) in [(3, 4, 5), (6, 10, 15), (8, 12, 7), (16, 9, 2)] {
            assert_eq!(
                lcm_many(&[a, b, c]).unwrap(),
                lcm(lcm(a, b).unwrap() as i64, c).unwrap()
            );
        }
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_prime_factors_ascending() {
        assert_eq!(prime_factors(12), vec![2, 2, 3]);
        assert_eq!(prime_factors(30), vec![2, 3, 5]);
        assert_eq!(prime_factors(49), vec![7, 7]);
        assert_eq!(prime_factors(13), vec![13]);
        assert!(prime_factors(1).is_empty());
    }

    #[test]
    fn test_prime_powers() {
        assert_eq!(prime_powers(24), vec![(2, 3), (3, 1)]);
        assert_eq!(prime_powers(1), vec![]);
    }

    #[test]
    fn test_divisors() {
        assert_eq!(divisors(12), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(1), vec![1]);
    }
}
