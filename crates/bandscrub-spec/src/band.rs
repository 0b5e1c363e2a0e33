//! Frequency band type.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError};

/// A closed frequency interval `[min_hz, max_hz]`.
///
/// Valid bands satisfy `0 <= min_hz < max_hz <= sample_rate / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrequencyBand {
    /// Lower edge in Hz (inclusive).
    pub min_hz: f64,
    /// Upper edge in Hz (inclusive).
    pub max_hz: f64,
}

impl FrequencyBand {
    /// Creates a new band. No validation is performed; see [`FrequencyBand::validate`].
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// Band width in Hz.
    pub fn width(&self) -> f64 {
        self.max_hz - self.min_hz
    }

    /// Band centre in Hz.
    pub fn center(&self) -> f64 {
        0.5 * (self.min_hz + self.max_hz)
    }

    /// Returns true if `freq_hz` lies inside the band (edges included).
    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.min_hz && freq_hz <= self.max_hz
    }

    /// Returns true if `other` lies entirely inside this band.
    pub fn contains_band(&self, other: &FrequencyBand) -> bool {
        self.contains(other.min_hz) && self.contains(other.max_hz)
    }

    /// Checks the band against the Nyquist frequency of `sample_rate`.
    pub fn validate(&self, sample_rate: u32) -> Result<(), ValidationError> {
        let nyquist = sample_rate as f64 / 2.0;

        if !self.min_hz.is_finite() || !self.max_hz.is_finite() {
            return Err(ValidationError::new(
                ErrorCode::InvalidFrequencyBand,
                format!(
                    "band edges must be finite, got [{}, {}]",
                    self.min_hz, self.max_hz
                ),
            ));
        }
        if self.min_hz < 0.0 {
            return Err(ValidationError::new(
                ErrorCode::InvalidFrequencyBand,
                format!("band minimum must be >= 0 Hz, got {}", self.min_hz),
            ));
        }
        if self.min_hz >= self.max_hz {
            return Err(ValidationError::new(
                ErrorCode::InvalidFrequencyBand,
                format!(
                    "band minimum ({} Hz) must be below band maximum ({} Hz)",
                    self.min_hz, self.max_hz
                ),
            ));
        }
        if self.max_hz > nyquist {
            return Err(ValidationError::new(
                ErrorCode::InvalidFrequencyBand,
                format!(
                    "band maximum ({} Hz) exceeds Nyquist ({} Hz)",
                    self.max_hz, nyquist
                ),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}] Hz", self.min_hz, self.max_hz)
    }
}
