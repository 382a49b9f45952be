//! Seeded RNG wrapper shared by the randomised parts of the engine.
//!
//! Two consumers draw from it: k-means++ centroid seeding in the region
//! partitioner, and the random speed model used for edge-weight synthesis.
//! Both must be reproducible, so neither ever touches `thread_rng`.
//!
//! `child` derives independent streams from one root seed:
//!
//!   child_seed = parent.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Deterministic RNG.  The same seed always yields the same sequence on a
/// given platform.
pub struct SeededRng(SmallRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SeededRng` with a different seed offset, useful for
    /// giving each consumer its own stream from the root seed.
    pub fn child(&mut self, offset: u64) -> SeededRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SeededRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for SeededRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SeededRng")
    }
}
