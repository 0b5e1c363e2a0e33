//! Seeded RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Library functions take an injected `&mut R: Rng`; these helpers are the
//! reproducible way to build one. Per-component seeds keep the noise phases
//! independent from any other consumer of the same run seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The seed is duplicated into both halves of the 64-bit PCG state seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a named component from a run seed.
///
/// Hashes the little-endian seed followed by the UTF-8 key with BLAKE3 and
/// keeps the first four bytes.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let [b0, b1, b2, b3, ..] = *hash.as_bytes();
    u32::from_le_bytes([b0, b1, b2, b3])
}

/// Creates an RNG for a named component of a seeded run.
pub fn create_component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

/// Draws a fresh run seed from the operating system's entropy source.
pub fn random_seed() -> u32 {
    rand::random()
}
