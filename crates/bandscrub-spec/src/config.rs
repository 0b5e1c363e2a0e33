//! Run configuration.
//!
//! [`RunConfig`] collects every scalar knob of a noise-injection run: signal
//! duration and sample rate, the filter design, the injected noise band and
//! amplitude, and where outputs go. It loads from JSON with per-field
//! defaults, so a config file only needs to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::band::FrequencyBand;
use crate::error::{SpecError, ValidationResult};
use crate::filter::{FilterMode, FilterSpec, WindowKind};
use crate::validation::validate_run_config;

/// Configuration for one noise-injection and filtering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Signal duration in seconds (used for the synthetic tone).
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f64,
    /// Sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Filter window.
    #[serde(default)]
    pub window: WindowKind,
    /// Lower filter edge in Hz.
    #[serde(default = "default_cutoff_hz_1")]
    pub cutoff_hz_1: f64,
    /// Upper filter edge in Hz.
    #[serde(default = "default_cutoff_hz_2")]
    pub cutoff_hz_2: f64,
    /// Desired stopband attenuation in dB.
    #[serde(default = "default_ripple_db")]
    pub ripple_db: f64,
    /// Pass policy of the filter.
    #[serde(default)]
    pub filter_mode: FilterMode,
    /// Lower edge of the injected noise band in Hz.
    #[serde(default = "default_noise_min_hz")]
    pub noise_min_hz: f64,
    /// Upper edge of the injected noise band in Hz.
    #[serde(default = "default_noise_max_hz")]
    pub noise_max_hz: f64,
    /// Scale applied to the synthesized noise.
    ///
    /// The synthesizer uses a `1/n` inverse FFT, so raw noise is tiny and the
    /// default is correspondingly large.
    #[serde(default = "default_noise_amplitude")]
    pub noise_amplitude: f64,
    /// Seed for the noise phases. `None` draws a fresh seed per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Frequency of the synthetic stand-in signal in Hz.
    #[serde(default = "default_tone_hz")]
    pub tone_hz: f64,
    /// Peak amplitude of the synthetic stand-in signal.
    #[serde(default = "default_tone_amplitude")]
    pub tone_amplitude: f64,
    /// Open the noisy and filtered files with the default player after a run.
    #[serde(default = "default_play")]
    pub play: bool,
    /// Directory outputs are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Number of frequency-response intervals over `[0, Nyquist]`.
    #[serde(default = "default_response_points")]
    pub response_points: usize,
}

fn default_duration_seconds() -> f64 {
    5.0
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_cutoff_hz_1() -> f64 {
    1900.0
}

fn default_cutoff_hz_2() -> f64 {
    2100.0
}

fn default_ripple_db() -> f64 {
    60.0
}

fn default_noise_min_hz() -> f64 {
    1950.0
}

fn default_noise_max_hz() -> f64 {
    2050.0
}

fn default_noise_amplitude() -> f64 {
    500.0
}

fn default_tone_hz() -> f64 {
    440.0
}

fn default_tone_amplitude() -> f64 {
    0.5
}

fn default_play() -> bool {
    true
}

fn default_output_dir() -> String {
    "out".to_string()
}

fn default_response_points() -> usize {
    8000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            sample_rate: default_sample_rate(),
            window: WindowKind::default(),
            cutoff_hz_1: default_cutoff_hz_1(),
            cutoff_hz_2: default_cutoff_hz_2(),
            ripple_db: default_ripple_db(),
            filter_mode: FilterMode::default(),
            noise_min_hz: default_noise_min_hz(),
            noise_max_hz: default_noise_max_hz(),
            noise_amplitude: default_noise_amplitude(),
            seed: None,
            tone_hz: default_tone_hz(),
            tone_amplitude: default_tone_amplitude(),
            play: default_play(),
            output_dir: default_output_dir(),
            response_points: default_response_points(),
        }
    }
}

impl RunConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serializes the config as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every field, collecting all errors and warnings.
    pub fn validate(&self) -> ValidationResult {
        validate_run_config(self)
    }

    /// The injected noise band.
    pub fn noise_band(&self) -> FrequencyBand {
        FrequencyBand::new(self.noise_min_hz, self.noise_max_hz)
    }

    /// The filter design parameters.
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(
            self.sample_rate,
            self.cutoff_hz_1,
            self.cutoff_hz_2,
            self.ripple_db,
        )
        .with_mode(self.filter_mode)
    }

    /// Number of samples in a synthetic signal of the configured duration.
    pub fn num_samples(&self) -> usize {
        (self.duration_seconds * self.sample_rate as f64).round() as usize
    }

    /// File name prefix shared by every output of this configuration,
    /// e.g. `noise_1950_2050_1900_2100_60`.
    pub fn file_prefix(&self) -> String {
        format!(
            "noise_{}_{}_{}_{}_{}",
            self.noise_min_hz, self.noise_max_hz, self.cutoff_hz_1, self.cutoff_hz_2, self.ripple_db
        )
    }
}
