//! Band-limited noise by spectral construction.
//!
//! The spectrum is built directly: unit magnitude on every FFT bin whose
//! absolute frequency falls inside the band, zero elsewhere. Positive bins get
//! independent uniform random phases, negative bins mirror them as complex
//! conjugates, and the inverse FFT of that Hermitian spectrum is a real signal
//! whose energy sits only in the requested band.

use std::f64::consts::TAU;

use bandscrub_spec::FrequencyBand;
use rand::Rng;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{DspError, DspResult};
use crate::signal::Signal;
use crate::spectrum::fft_frequency;

/// Generates real noise confined to a frequency band.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralNoiseSynthesizer;

impl SpectralNoiseSynthesizer {
    /// Synthesizes `sample_count` samples of noise inside `band`.
    ///
    /// The inverse transform is scaled by `1/n`, so the output is small
    /// (roughly `sqrt(bins in band) / n` RMS); callers scale it to taste.
    /// The DC bin and, for even `n`, the Nyquist bin keep phase zero.
    ///
    /// # Errors
    /// `EmptyInput` if `sample_count` is zero, `InvalidSpec` if the band is
    /// malformed for `sample_rate`.
    pub fn synthesize<R: Rng + ?Sized>(
        band: &FrequencyBand,
        sample_count: usize,
        sample_rate: u32,
        rng: &mut R,
    ) -> DspResult<Signal> {
        if sample_count == 0 {
            return Err(DspError::empty_input("noise length must be at least one sample"));
        }
        if sample_rate == 0 {
            return Err(DspError::invalid_param(
                "sample_rate",
                "sample rate must be positive",
            ));
        }
        band.validate(sample_rate)?;

        let mut spectrum = band_mask(band, sample_count, sample_rate);
        randomize_phases(&mut spectrum, rng);

        let mut planner = FftPlanner::<f64>::new();
        let ifft = planner.plan_fft_inverse(sample_count);
        ifft.process(&mut spectrum);

        let scale = 1.0 / sample_count as f64;
        let samples = spectrum.iter().map(|c| c.re * scale).collect();
        Signal::new(samples, sample_rate)
    }
}

/// Unit magnitude on every bin whose absolute frequency lies in `band`.
fn band_mask(band: &FrequencyBand, n: usize, sample_rate: u32) -> Vec<Complex<f64>> {
    (0..n)
        .map(|k| {
            let freq = fft_frequency(k, n, sample_rate).abs();
            let magnitude = if band.contains(freq) { 1.0 } else { 0.0 };
            Complex::new(magnitude, 0.0)
        })
        .collect()
}

/// Applies random phases to bins `1..=(n-1)/2` and mirrors them onto the
/// negative-frequency half.
fn randomize_phases<R: Rng + ?Sized>(spectrum: &mut [Complex<f64>], rng: &mut R) {
    let n = spectrum.len();
    let positive_bins = (n.saturating_sub(1)) / 2;

    for k in 1..=positive_bins {
        let theta = rng.gen::<f64>() * TAU;
        let value = spectrum[k] * Complex::from_polar(1.0, theta);
        spectrum[k] = value;
        spectrum[n - k] = value.conj();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use rand::rngs::mock::StepRng;

    fn forward_fft(samples: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::<f64>::new()
            .plan_fft_forward(buffer.len())
            .process(&mut buffer);
        buffer
    }

    #[test]
    fn test_length_and_rate() {
        let band = FrequencyBand::new(100.0, 200.0);
        let noise =
            SpectralNoiseSynthesizer::synthesize(&band, 1000, 1000, &mut create_rng(1)).unwrap();
        assert_eq!(noise.len(), 1000);
        assert_eq!(noise.sample_rate(), 1000);
    }

    #[test]
    fn test_energy_confined_to_band() {
        let band = FrequencyBand::new(100.0, 200.0);
        let noise =
            SpectralNoiseSynthesizer::synthesize(&band, 1000, 1000, &mut create_rng(7)).unwrap();
        let spectrum = forward_fft(noise.samples());

        for (k, bin) in spectrum.iter().enumerate() {
            let freq = fft_frequency(k, 1000, 1000).abs();
            if band.contains(freq) {
                // |X[k]| = 1 after the 1/n scaling round trip.
                assert!((bin.norm() - 1.0).abs() < 1e-9, "bin {} = {}", k, bin);
            } else {
                assert!(bin.norm() < 1e-9, "leak at bin {} ({} Hz): {}", k, freq, bin);
            }
        }
    }

    #[test]
    fn test_zero_phase_rng_gives_cosine_sum() {
        // With every phase at zero the noise is a sum of cosines, so the
        // first sample is bins_in_band / n.
        let band = FrequencyBand::new(10.0, 12.0);
        let mut rng = StepRng::new(0, 0);
        let noise = SpectralNoiseSynthesizer::synthesize(&band, 100, 100, &mut rng).unwrap();
        // Bins 10, 11, 12 and their mirrors.
        assert!((noise.samples()[0] - 6.0 / 100.0).abs() < 1e-12);
        // Symmetric in time.
        for i in 1..50 {
            assert!((noise.samples()[i] - noise.samples()[100 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dc_and_nyquist_bins_stay_real() {
        let band = FrequencyBand::new(0.0, 50.0);
        let noise =
            SpectralNoiseSynthesizer::synthesize(&band, 100, 100, &mut create_rng(3)).unwrap();
        let spectrum = forward_fft(noise.samples());
        assert!((spectrum[0].re - 1.0).abs() < 1e-9);
        assert!(spectrum[0].im.abs() < 1e-9);
        assert!((spectrum[50].re - 1.0).abs() < 1e-9);
        assert!(spectrum[50].im.abs() < 1e-9);
    }

    #[test]
    fn test_odd_length() {
        let band = FrequencyBand::new(20.0, 30.0);
        let noise =
            SpectralNoiseSynthesizer::synthesize(&band, 101, 101, &mut create_rng(5)).unwrap();
        let spectrum = forward_fft(noise.samples());
        for k in 1..=50 {
            assert!((spectrum[k] - spectrum[101 - k].conj()).norm() < 1e-9);
        }
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let band = FrequencyBand::new(1950.0, 2050.0);
        let a = SpectralNoiseSynthesizer::synthesize(&band, 4410, 44100, &mut create_rng(42))
            .unwrap();
        let b = SpectralNoiseSynthesizer::synthesize(&band, 4410, 44100, &mut create_rng(42))
            .unwrap();
        let c = SpectralNoiseSynthesizer::synthesize(&band, 4410, 44100, &mut create_rng(43))
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_errors() {
        let band = FrequencyBand::new(100.0, 200.0);
        assert!(matches!(
            SpectralNoiseSynthesizer::synthesize(&band, 0, 1000, &mut create_rng(1)),
            Err(DspError::EmptyInput { .. })
        ));

        let above_nyquist = FrequencyBand::new(100.0, 600.0);
        assert!(matches!(
            SpectralNoiseSynthesizer::synthesize(&above_nyquist, 10, 1000, &mut create_rng(1)),
            Err(DspError::InvalidSpec(_))
        ));

        let inverted = FrequencyBand::new(200.0, 100.0);
        assert!(matches!(
            SpectralNoiseSynthesizer::synthesize(&inverted, 10, 1000, &mut create_rng(1)),
            Err(DspError::InvalidSpec(_))
        ));
    }
}
