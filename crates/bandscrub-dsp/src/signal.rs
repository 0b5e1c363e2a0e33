//! Mono sample buffers tagged with a sample rate.

use std::sync::Arc;

use crate::error::{DspError, DspResult};

/// An immutable mono signal.
///
/// Samples are `f64` in the normalized range. The buffer is reference-counted,
/// so clones are cheap and a signal can be shared across threads. Every
/// processing stage returns a new `Signal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Arc<[f64]>,
    sample_rate: u32,
}

impl Signal {
    /// Creates a signal from samples.
    ///
    /// Fails with `InvalidParameter` if `sample_rate` is zero. Empty sample
    /// buffers are allowed here; operations that need data reject them.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> DspResult<Self> {
        if sample_rate == 0 {
            return Err(DspError::invalid_param(
                "sample_rate",
                "sample rate must be positive",
            ));
        }
        Ok(Self {
            samples: samples.into(),
            sample_rate,
        })
    }

    /// Creates a signal of `len` zeros.
    pub fn silence(len: usize, sample_rate: u32) -> DspResult<Self> {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Creates a sine tone `amplitude * sin(2π f t)` of `len` samples.
    pub fn sine(
        frequency_hz: f64,
        amplitude: f64,
        len: usize,
        sample_rate: u32,
    ) -> DspResult<Self> {
        let step = 2.0 * std::f64::consts::PI * frequency_hz / sample_rate.max(1) as f64;
        let samples = (0..len).map(|i| amplitude * (step * i as f64).sin()).collect();
        Self::new(samples, sample_rate)
    }

    /// The samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value (0 for an empty signal).
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc: f64, &s| acc.max(s.abs()))
    }

    /// Returns `self + gain * other`, sample by sample.
    ///
    /// Both signals must have the same length and sample rate.
    pub fn mix(&self, other: &Signal, gain: f64) -> DspResult<Signal> {
        if other.len() != self.len() {
            return Err(DspError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        if other.sample_rate != self.sample_rate {
            return Err(DspError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: other.sample_rate,
            });
        }

        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(&a, &b)| a + gain * b)
            .collect();
        Signal::new(samples, self.sample_rate)
    }

    /// Returns a copy with every sample multiplied by `gain`.
    pub fn scaled(&self, gain: f64) -> Signal {
        Signal {
            samples: self.samples.iter().map(|&s| s * gain).collect(),
            sample_rate: self.sample_rate,
        }
    }
}
