//! Magnitude response of FIR taps.

use bandscrub_spec::validation::MAX_RESPONSE_POINTS;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::Serialize;

use crate::design::FilterTaps;
use crate::error::{DspError, DspResult};

/// One sample of a magnitude response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    /// Frequency in Hz.
    pub frequency_hz: f64,
    /// Linear gain `|H(f)|`.
    pub magnitude: f64,
}

/// Magnitude response sampled on a uniform grid over `[0, Nyquist]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResponse {
    points: Vec<ResponsePoint>,
}

impl FrequencyResponse {
    /// Evaluates `|H(f)|` at `f_k = k · nyquist / intervals` for
    /// `k = 0..=intervals`.
    ///
    /// Uses one FFT of size `2 · intervals`. Taps longer than that are folded
    /// modulo the FFT size first, which leaves the values at the grid
    /// frequencies exact.
    pub fn compute(taps: &FilterTaps, intervals: usize) -> DspResult<Self> {
        if intervals == 0 {
            return Err(DspError::invalid_param(
                "response_points",
                "at least one interval is required",
            ));
        }
        if taps.is_empty() {
            return Err(DspError::EmptyTaps);
        }

        let fft_size = intervals
            .checked_mul(2)
            .filter(|_| intervals <= MAX_RESPONSE_POINTS)
            .ok_or_else(|| {
                DspError::invalid_param(
                    "response_points",
                    format!(
                        "{} intervals exceeds the limit of {}",
                        intervals, MAX_RESPONSE_POINTS
                    ),
                )
            })?;
        let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];
        for (i, &h) in taps.coefficients().iter().enumerate() {
            buffer[i % fft_size].re += h;
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);
        fft.process(&mut buffer);

        let nyquist = taps.sample_rate() as f64 / 2.0;
        let points = buffer[..=intervals]
            .iter()
            .enumerate()
            .map(|(k, c)| ResponsePoint {
                frequency_hz: k as f64 * nyquist / intervals as f64,
                magnitude: c.norm(),
            })
            .collect();

        Ok(Self { points })
    }

    /// All samples, ordered by frequency.
    pub fn points(&self) -> &[ResponsePoint] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The sample closest to `frequency_hz`.
    pub fn nearest(&self, frequency_hz: f64) -> Option<ResponsePoint> {
        self.points.iter().copied().min_by(|a, b| {
            (a.frequency_hz - frequency_hz)
                .abs()
                .total_cmp(&(b.frequency_hz - frequency_hz).abs())
        })
    }

    /// Largest gain at or between `min_hz` and `max_hz`.
    pub fn max_magnitude_in(&self, min_hz: f64, max_hz: f64) -> Option<f64> {
        self.points
            .iter()
            .filter(|p| p.frequency_hz >= min_hz && p.frequency_hz <= max_hz)
            .map(|p| p.magnitude)
            .max_by(f64::total_cmp)
    }
}
