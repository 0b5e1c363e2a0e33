//! JSON output types for machine-readable CLI output.
//!
//! Every subcommand accepts `--json` and then prints exactly one document
//! to stdout: `success`, `errors`, `warnings`, and a command-specific
//! `result` on success.

use anyhow::{Context, Result};
use serde::Serialize;

/// Error codes for CLI operations.
///
/// Validation failures pass through the config codes (`E001`...) instead.
pub mod error_codes {
    /// Config file could not be read or parsed
    pub const CONFIG_LOAD: &str = "CLI_001";
    /// Input WAV could not be read
    pub const INPUT_READ: &str = "CLI_002";
    /// Noise synthesis, filter design or filtering failed
    pub const PROCESSING: &str = "CLI_003";
    /// An output file could not be written
    pub const OUTPUT_WRITE: &str = "CLI_004";
    /// A command argument is out of range
    pub const INVALID_ARGUMENT: &str = "CLI_005";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// Samples outside [-1, 1] were clipped when writing a WAV
    pub const CLIPPED: &str = "CLI_W001";
    /// The default player could not be launched
    pub const PLAYBACK: &str = "CLI_W002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Config field the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the config field path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Builds an error from an `anyhow` chain, keeping every cause.
    pub fn from_anyhow(code: &str, err: &anyhow::Error) -> Self {
        Self::new(code, format!("{:#}", err))
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "CLI_W001", "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Config field the warning refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File the warning refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the config field path for this warning.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file for this warning.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Converts a config validation error.
pub fn validation_error_to_json(err: &bandscrub_spec::ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    error
}

/// Converts a config validation warning.
pub fn validation_warning_to_json(warn: &bandscrub_spec::ValidationWarning) -> JsonWarning {
    let mut warning = JsonWarning::new(warn.code.to_string(), &warn.message);
    if let Some(ref path) = warn.path {
        warning = warning.with_path(path);
    }
    warning
}

/// Output envelope shared by every command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors that stopped the command
    pub errors: Vec<JsonError>,
    /// Non-fatal findings
    pub warnings: Vec<JsonWarning>,
    /// Command result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }

    /// Prints the output as pretty JSON on stdout.
    pub fn print(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize JSON output")?;
        println!("{}", json);
        Ok(())
    }
}

/// Files and measurements of a `run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Seed the noise phases were derived from
    pub seed: u32,
    /// True if the seed was drawn at random for this run
    pub seed_generated: bool,
    /// BLAKE3 hash of the effective config JSON
    pub config_hash: String,
    /// Sample rate of every output in Hz
    pub sample_rate: u32,
    /// Samples per output file
    pub num_samples: usize,
    /// Number of filter taps
    pub num_taps: usize,
    /// Kaiser window shape parameter
    pub beta: f64,
    /// Group delay in seconds
    pub delay_seconds: f64,
    /// First filtered sample free of the startup transient
    pub valid_from_index: usize,
    /// Noise band energy reduction over the valid region, in dB
    pub noise_band_attenuation_db: Option<f64>,
    /// Written files
    pub files: RunFiles,
}

/// Output paths of a `run`, with PCM hashes for the WAVs.
#[derive(Debug, Clone, Serialize)]
pub struct RunFiles {
    /// The clean input
    pub clean: OutputFile,
    /// Clean plus injected noise
    pub noisy: OutputFile,
    /// Filtered noisy signal
    pub filtered: OutputFile,
    /// Frequency response document
    pub response: String,
}

/// One written WAV file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    /// File path
    pub path: String,
    /// BLAKE3 hash of the PCM payload
    pub pcm_hash: String,
}

/// Result of `design`.
#[derive(Debug, Clone, Serialize)]
pub struct DesignResult {
    /// Filter pass policy
    pub mode: String,
    /// Number of taps
    pub num_taps: usize,
    /// Kaiser window shape parameter
    pub beta: f64,
    /// Group delay in samples
    pub delay_samples: f64,
    /// Group delay in seconds
    pub delay_seconds: f64,
    /// Transition width in Hz
    pub transition_width_hz: f64,
    /// Gain at the centre of the edge pair, in dB
    pub center_gain_db: f64,
    /// Taps file, if written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taps_file: Option<String>,
    /// Response file, if written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_file: Option<String>,
}

/// Result of `noise`.
#[derive(Debug, Clone, Serialize)]
pub struct NoiseResult {
    /// Seed the phases were derived from
    pub seed: u32,
    /// True if the seed was drawn at random for this run
    pub seed_generated: bool,
    /// Band lower edge in Hz
    pub min_hz: f64,
    /// Band upper edge in Hz
    pub max_hz: f64,
    /// Peak absolute sample after scaling
    pub peak: f64,
    /// Written file
    pub file: OutputFile,
}

/// Result of `analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResult {
    /// Analyzed file
    pub file: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of (mono) samples
    pub num_samples: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Peak absolute sample
    pub peak: f64,
    /// Total energy
    pub total_energy: f64,
    /// Energy inside the band
    pub band_energy: f64,
    /// Band energy relative to total, in dB
    pub band_share_db: f64,
    /// Band attenuation relative to the reference file, in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation_db: Option<f64>,
}

/// Converts a ratio that may be infinite into a JSON-safe value.
///
/// `serde_json` writes non-finite floats as `null`; this makes the intent
/// explicit at the call site.
pub fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscrub_spec::{ErrorCode, ValidationError};

    #[test]
    fn test_failure_omits_result() {
        let output: CommandOutput<NoiseResult> = CommandOutput::failure(
            vec![JsonError::new(error_codes::INPUT_READ, "missing").with_file("a.wav")],
            vec![],
        );
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("result").is_none());
        assert_eq!(json["errors"][0]["code"], "CLI_002");
        assert_eq!(json["errors"][0]["file"], "a.wav");
        assert!(json["errors"][0].get("path").is_none());
    }

    #[test]
    fn test_validation_error_keeps_code_and_path() {
        let err = ValidationError::with_path(
            ErrorCode::InvalidFrequencyBand,
            "noise band exceeds Nyquist",
            "noise_max_hz",
        );
        let json = validation_error_to_json(&err);
        assert_eq!(json.code, "E003");
        assert_eq!(json.path.as_deref(), Some("noise_max_hz"));
    }

    #[test]
    fn test_finite_or_none() {
        assert_eq!(finite_or_none(3.0), Some(3.0));
        assert_eq!(finite_or_none(f64::INFINITY), None);
        assert_eq!(finite_or_none(f64::NAN), None);
    }
}
