//! Determinism checks.
//!
//! Runs a generation function several times and compares the outputs byte
//! for byte, reporting the first offset that differs.

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the first output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first output.
    pub hash: String,
    /// First differing byte offset and the run it came from.
    pub first_difference: Option<(usize, usize)>,
}

/// BLAKE3 hex digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Little-endian bytes of `samples`, for hashing exact floating-point output.
pub fn samples_to_bytes(samples: &[f64]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Calls `generate_fn` `runs` times and compares every output to the first.
///
/// # Panics
/// If `runs` is less than 2.
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference_bytes = reference.as_ref();
    let hash = compute_hash(reference_bytes);

    for run_index in 1..runs {
        let output = generate_fn();
        let output_bytes = output.as_ref();

        let offset = reference_bytes
            .iter()
            .zip(output_bytes)
            .position(|(a, b)| a != b)
            .or_else(|| {
                (reference_bytes.len() != output_bytes.len())
                    .then(|| reference_bytes.len().min(output_bytes.len()))
            });

        if let Some(offset) = offset {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                output_size: reference_bytes.len(),
                hash,
                first_difference: Some((offset, run_index)),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        output_size: reference_bytes.len(),
        hash,
        first_difference: None,
    }
}
