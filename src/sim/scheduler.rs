//! Randomized per-time-unit advance scheduling, and the pluggable
//! randomness source that makes a run reproducible given a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Anything that can hand out a random index in `0..n`. Implemented as a
/// trait so tests can substitute a deterministic stub without depending
/// on `rand`'s exact RNG internals.
pub trait RandomSource {
    fn gen_range(&mut self, n: usize) -> usize;
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededRandom {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn gen_range(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}
