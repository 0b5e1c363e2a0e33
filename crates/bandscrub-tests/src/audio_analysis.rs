//! Signal measurements for checking pipeline output.
//!
//! Band levels go through `bandscrub_dsp::spectrum`, so a test measures
//! energy the same way the CLI reports it.

use bandscrub_dsp::spectrum::{attenuation_db, band_energy_of, total_energy_of};
use bandscrub_dsp::FrequencyBand;

/// Root mean square of `samples`; zero for an empty slice.
pub fn calculate_rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (total_energy_of(samples) / samples.len() as f64).sqrt()
}

/// True if every sample is within `threshold` of zero.
pub fn is_silent(samples: &[f64], threshold: f64) -> bool {
    samples.iter().all(|s| s.abs() <= threshold)
}

/// How much quieter `band` is in `after` than in `before`, in dB.
pub fn band_attenuation_db(
    before: &[f64],
    after: &[f64],
    sample_rate: u32,
    band: &FrequencyBand,
) -> f64 {
    attenuation_db(
        band_energy_of(before, sample_rate, band),
        band_energy_of(after, sample_rate, band),
    )
}

/// Energy ratio of `after` to `before` over all frequencies, in dB.
pub fn energy_change_db(before: &[f64], after: &[f64]) -> f64 {
    -attenuation_db(total_energy_of(before), total_energy_of(after))
}
