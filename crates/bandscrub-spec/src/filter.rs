//! FIR filter specification types.

use serde::{Deserialize, Serialize};

use crate::band::FrequencyBand;
use crate::error::{ErrorCode, ValidationError};

/// Which side of the edge pair the filter passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Reject `[edge_low, edge_high]` and pass everything else (notch).
    /// Gain is normalized to unity at DC.
    #[default]
    Stopband,
    /// Pass only `[edge_low, edge_high]`.
    /// Gain is normalized to unity at the band centre.
    Passband,
}

impl FilterMode {
    /// Returns the mode name used in config files and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Stopband => "stopband",
            FilterMode::Passband => "passband",
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopband" => Ok(FilterMode::Stopband),
            "passband" => Ok(FilterMode::Passband),
            other => Err(format!(
                "unknown filter mode '{}' (expected stopband or passband)",
                other
            )),
        }
    }
}

/// Largest ripple a design accepts.
///
/// Kaiser β grows linearly with the ripple; far past this bound `I0(β)`
/// overflows `f64` and the window is undefined.
pub const MAX_RIPPLE_DB: f64 = 1000.0;

/// Window used by the windowed-sinc design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Kaiser window; order and shape derived from ripple and transition width.
    #[default]
    Kaiser,
}

impl WindowKind {
    /// Returns the window name used in config files and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Kaiser => "kaiser",
        }
    }
}

impl std::str::FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kaiser" => Ok(WindowKind::Kaiser),
            other => Err(format!("unsupported window '{}' (expected kaiser)", other)),
        }
    }
}

/// Parameters for a Kaiser windowed-sinc FIR design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Lower band edge in Hz.
    pub edge_low_hz: f64,
    /// Upper band edge in Hz. Also sets the transition width.
    pub edge_high_hz: f64,
    /// Ripple / stopband attenuation in dB.
    pub ripple_db: f64,
    /// Pass policy.
    #[serde(default)]
    pub mode: FilterMode,
}

impl FilterSpec {
    /// Creates a stopband spec.
    pub fn new(sample_rate: u32, edge_low_hz: f64, edge_high_hz: f64, ripple_db: f64) -> Self {
        Self {
            sample_rate,
            edge_low_hz,
            edge_high_hz,
            ripple_db,
            mode: FilterMode::Stopband,
        }
    }

    /// Returns a copy with the given pass policy.
    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// The edge pair as a band.
    pub fn band(&self) -> FrequencyBand {
        FrequencyBand::new(self.edge_low_hz, self.edge_high_hz)
    }

    /// Transition width relative to Nyquist.
    pub fn transition_width(&self) -> f64 {
        (self.edge_high_hz - self.edge_low_hz) / self.nyquist()
    }

    /// Checks the filter invariants.
    ///
    /// Requires `0 < edge_low_hz < edge_high_hz <= sample_rate / 2` and
    /// `0 < ripple_db <= MAX_RIPPLE_DB`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_rate == 0 {
            return Err(ValidationError::with_path(
                ErrorCode::InvalidSampleRate,
                "sample rate must be positive",
                "sample_rate",
            ));
        }

        let nyquist = self.nyquist();
        let (low, high) = (self.edge_low_hz, self.edge_high_hz);

        if !low.is_finite() || !high.is_finite() {
            return Err(ValidationError::new(
                ErrorCode::InvalidFilterEdges,
                format!("filter edges must be finite, got {} and {}", low, high),
            ));
        }
        if low <= 0.0 || high <= 0.0 {
            return Err(ValidationError::new(
                ErrorCode::InvalidFilterEdges,
                format!("filter edges must be positive, got {} and {}", low, high),
            ));
        }
        if low >= high {
            return Err(ValidationError::new(
                ErrorCode::InvalidFilterEdges,
                format!(
                    "lower edge ({} Hz) must be below upper edge ({} Hz)",
                    low, high
                ),
            ));
        }
        if high > nyquist {
            return Err(ValidationError::new(
                ErrorCode::InvalidFilterEdges,
                format!("upper edge ({} Hz) exceeds Nyquist ({} Hz)", high, nyquist),
            ));
        }
        if !self.ripple_db.is_finite() || self.ripple_db <= 0.0 {
            return Err(ValidationError::with_path(
                ErrorCode::InvalidRipple,
                format!("ripple must be a positive number of dB, got {}", self.ripple_db),
                "ripple_db",
            ));
        }
        if self.ripple_db > MAX_RIPPLE_DB {
            return Err(ValidationError::with_path(
                ErrorCode::InvalidRipple,
                format!(
                    "ripple {} dB exceeds the {} dB limit",
                    self.ripple_db, MAX_RIPPLE_DB
                ),
                "ripple_db",
            ));
        }

        Ok(())
    }
}
