//! Random sources for the humanizer's dither and breath noise.
//!
//! The engine draws all randomness through [`RandomSource`] so tests can
//! swap in a seeded PCG32 stream or a source that always returns zero.
//! Seeds are derived using BLAKE3 hashing so that independent sessions
//! sharing a base seed get independent streams.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A uniform random source in `[-1.0, 1.0)`.
pub trait RandomSource {
    /// Returns the next uniform value in `[-1.0, 1.0)`.
    fn next_bipolar(&mut self) -> f64;

    /// Returns the next uniform value in `[-bound, bound)`.
    #[inline]
    fn next_within(&mut self, bound: f64) -> f64 {
        self.next_bipolar() * bound
    }
}

/// Deterministic PCG32 source.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: Pcg32,
}

impl SeededSource {
    /// Creates a source from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }

    /// Creates a source for a named component of a session.
    pub fn for_component(base_seed: u32, key: &str) -> Self {
        Self::new(derive_component_seed(base_seed, key))
    }
}

impl RandomSource for SeededSource {
    #[inline]
    fn next_bipolar(&mut self) -> f64 {
        self.rng.gen::<f64>() * 2.0 - 1.0
    }
}

/// Production source seeded from OS entropy.
///
/// Real breath noise should not repeat identically between runs.
#[derive(Debug, Clone)]
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    /// Creates a source seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    #[inline]
    fn next_bipolar(&mut self) -> f64 {
        self.rng.gen_range(-1.0..1.0)
    }
}

/// Source that always returns zero. Disables every random term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroSource;

impl RandomSource for ZeroSource {
    #[inline]
    fn next_bipolar(&mut self) -> f64 {
        0.0
    }
}

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a named component from the base seed.
///
/// Uses BLAKE3 to hash the base seed concatenated with the key, so
/// `("noise", 42)` and `("utterance-3", 42)` give unrelated streams.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);

    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
