//! Random sources consumed by the generator.
//!
//! All randomness in pattern evaluation goes through the three primitives of
//! [`RandomSource`]. [`RngSource`] implements them on top of any `rand` RNG:
//! OS entropy for real passwords, or a seeded Xoshiro256** stream when the
//! output has to be reproducible.

use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// The randomness primitives used by pattern evaluation
///
/// Implementations must handle the degenerate cases: `uniform_int(x, x)`
/// returns `x`, `uniform_choice(1)` returns 0, `bernoulli(0.0)` is false and
/// `bernoulli(1.0)` is true.
pub trait RandomSource {
    /// Integer drawn uniformly from `lo..=hi`
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64;

    /// Index drawn uniformly from `0..n`; `n` is at least 1
    fn uniform_choice(&mut self, n: usize) -> usize;

    /// `true` with probability `p`
    fn bernoulli(&mut self, p: f64) -> bool;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        (**self).uniform_int(lo, hi)
    }

    fn uniform_choice(&mut self, n: usize) -> usize {
        (**self).uniform_choice(n)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        (**self).bernoulli(p)
    }
}

/// A [`RandomSource`] backed by a `rand` RNG
///
/// Counts every primitive call so callers can check how many draws a
/// generation consumed.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
    draws: u64,
}

impl RngSource<OsRng> {
    /// Source drawing from the operating system's entropy
    pub fn os() -> Self {
        RngSource::new(OsRng)
    }
}

impl Default for RngSource<OsRng> {
    fn default() -> Self {
        RngSource::os()
    }
}

impl RngSource<Xoshiro256StarStar> {
    /// Reproducible source: the same seed always yields the same draws
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(Xoshiro256StarStar::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng, draws: 0 }
    }

    /// Number of primitive calls made so far
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        self.draws += 1;
        debug_assert!(lo <= hi, "uniform_int called with lo > hi");
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn uniform_choice(&mut self, n: usize) -> usize {
        self.draws += 1;
        debug_assert!(n > 0, "uniform_choice called with n == 0");
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.draws += 1;
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen_bool(p)
    }
}
