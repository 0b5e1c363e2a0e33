//! Causal direct-form FIR filtering.

use crate::design::FilterTaps;
use crate::error::{DspError, DspResult};
use crate::signal::Signal;

/// Filtered signal plus the index where the startup transient ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    /// Filtered samples; same length and rate as the input.
    pub output: Signal,
    /// First sample computed from a full window of real input (`N − 1`).
    ///
    /// Samples before this index were computed against zero history. They are
    /// kept, never trimmed.
    pub valid_from_index: usize,
}

impl FilterOutput {
    /// The post-transient samples. Empty if the input was shorter than the
    /// filter.
    pub fn valid_samples(&self) -> &[f64] {
        let samples = self.output.samples();
        &samples[self.valid_from_index.min(samples.len())..]
    }
}

/// Applies FIR taps to whole signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirFilterEngine;

impl FirFilterEngine {
    /// Computes `y[n] = Σ h[k]·x[n−k]` with `x[n] = 0` for `n < 0`.
    ///
    /// # Errors
    /// `EmptyInput` for an empty signal, `EmptyTaps` for empty taps and
    /// `SampleRateMismatch` if the taps were designed for another rate.
    pub fn apply(taps: &FilterTaps, input: &Signal) -> DspResult<FilterOutput> {
        let h = taps.coefficients();
        if h.is_empty() {
            return Err(DspError::EmptyTaps);
        }
        if input.is_empty() {
            return Err(DspError::empty_input("cannot filter an empty signal"));
        }
        if taps.sample_rate() != input.sample_rate() {
            return Err(DspError::SampleRateMismatch {
                expected: taps.sample_rate(),
                actual: input.sample_rate(),
            });
        }

        let output = convolve_causal(h, input.samples());
        Ok(FilterOutput {
            output: Signal::new(output, input.sample_rate())?,
            valid_from_index: h.len() - 1,
        })
    }
}

/// Causal convolution truncated to the input length.
fn convolve_causal(h: &[f64], x: &[f64]) -> Vec<f64> {
    (0..x.len())
        .map(|n| {
            let history = &x[n.saturating_sub(h.len() - 1)..=n];
            h.iter()
                .zip(history.iter().rev())
                .map(|(&hk, &xk)| hk * xk)
                .sum()
        })
        .collect()
}
