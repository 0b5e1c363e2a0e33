//! bandscrub End-to-End Test Infrastructure
//!
//! Integration tests for the flows that matter end to end:
//!
//! - Pipeline: clean signal -> noisy -> filtered, with measured attenuation
//! - Determinism: identical output for identical seeds
//! - CLI: commands write the expected files into a scratch directory
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bandscrub-tests
//! ```

pub mod audio_analysis;
pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, samples_to_bytes, verify_determinism, DeterminismResult};
