//! Spectral energy measurements.
//!
//! Energies are reported in time-domain units: `band_energy` is
//! `(1/n) Σ |X[k]|²` over the bins in the band, so by Parseval the band
//! energies of a partition of `[0, Nyquist]` add up to [`total_energy`].

use bandscrub_spec::FrequencyBand;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::signal::Signal;

/// Frequency in Hz of FFT bin `k` of an `n`-point transform.
///
/// Bins below `ceil(n/2)` are positive; the rest are negative. For even `n`
/// the Nyquist bin is reported as `-sample_rate / 2`.
pub fn fft_frequency(k: usize, n: usize, sample_rate: u32) -> f64 {
    let resolution = sample_rate as f64 / n as f64;
    if k < n.div_ceil(2) {
        k as f64 * resolution
    } else {
        (k as f64 - n as f64) * resolution
    }
}

/// Energy of `signal` in `band`, both spectral halves included.
pub fn band_energy(signal: &Signal, band: &FrequencyBand) -> f64 {
    band_energy_of(signal.samples(), signal.sample_rate(), band)
}

/// [`band_energy`] for a raw sample slice.
pub fn band_energy_of(samples: &[f64], sample_rate: u32, band: &FrequencyBand) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let sum: f64 = buffer
        .iter()
        .enumerate()
        .filter(|(k, _)| band.contains(fft_frequency(*k, n, sample_rate).abs()))
        .map(|(_, c)| c.norm_sqr())
        .sum();
    sum / n as f64
}

/// Total energy `Σ x²` of `signal`.
pub fn total_energy(signal: &Signal) -> f64 {
    total_energy_of(signal.samples())
}

/// [`total_energy`] for a raw sample slice.
pub fn total_energy_of(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s * s).sum()
}

/// Energy ratio `before / after` in dB. Positive means `after` is quieter.
///
/// Silence after a non-silent input is infinitely attenuated; two silent
/// inputs give 0 dB.
pub fn attenuation_db(before: f64, after: f64) -> f64 {
    match (before > 0.0, after > 0.0) {
        (true, true) => 10.0 * (before / after).log10(),
        (true, false) => f64::INFINITY,
        (false, true) => f64::NEG_INFINITY,
        (false, false) => 0.0,
    }
}
