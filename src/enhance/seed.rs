//! Seed derivation and the seeded generator driving synthetic data

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Derive the seed for an initiative id.
///
/// The whole id is hashed, so ids that only share a trailing character do
/// not collide. Equal ids always give equal seeds.
pub fn seed_for(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Deterministic generator for one initiative.
///
/// Every draw advances the same stream, so callers must draw in a fixed
/// order for the output to stay reproducible.
pub struct SeededRng {
    seed: u64,
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_id(id: &str) -> Self {
        Self::new(seed_for(id))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Inclusive count in `min..=max`
    pub fn count(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }

    /// Index into a slice of length `len` (`len` must be non-zero)
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }

    /// Whole days in `min..=max`
    pub fn days(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    pub fn between(&mut self, min: u64, max: u64) -> u64 {
        self.rng.gen_range(min..=max)
    }
}
