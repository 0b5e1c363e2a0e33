//! Run configuration validation.
//!
//! Every check runs regardless of earlier failures so that a bad config
//! reports all of its problems at once.

use crate::config::RunConfig;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::filter::FilterMode;

/// Lowest ripple the Kaiser order estimate is defined for.
pub const KAISER_MIN_RIPPLE_DB: f64 = 8.0;

/// Upper bound on `response_points`; the response FFT is twice this size.
pub const MAX_RESPONSE_POINTS: usize = 1 << 20;

/// Validates a run configuration and returns all errors and warnings.
///
/// # Example
/// ```
/// use bandscrub_spec::RunConfig;
/// use bandscrub_spec::validation::validate_run_config;
///
/// let result = validate_run_config(&RunConfig::default());
/// assert!(result.is_ok());
/// ```
pub fn validate_run_config(config: &RunConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_sample_rate(config, &mut result);
    validate_duration(config, &mut result);
    validate_amplitudes(config, &mut result);

    if config.response_points == 0 || config.response_points > MAX_RESPONSE_POINTS {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidResponsePoints,
            format!(
                "response_points must be in 1..={}, got {}",
                MAX_RESPONSE_POINTS, config.response_points
            ),
            "response_points",
        ));
    }

    // Frequency checks need a Nyquist to compare against.
    if config.sample_rate > 0 {
        validate_filter(config, &mut result);
        validate_noise_band(config, &mut result);
        validate_tone(config, &mut result);
    }

    if result.is_ok() {
        check_warnings(config, &mut result);
    }

    result
}

fn validate_sample_rate(config: &RunConfig, result: &mut ValidationResult) {
    if config.sample_rate == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidSampleRate,
            "sample_rate must be positive",
            "sample_rate",
        ));
    }
}

fn validate_duration(config: &RunConfig, result: &mut ValidationResult) {
    if !config.duration_seconds.is_finite() || config.duration_seconds <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            format!(
                "duration_seconds must be a positive number, got {}",
                config.duration_seconds
            ),
            "duration_seconds",
        ));
    }
}

fn validate_amplitudes(config: &RunConfig, result: &mut ValidationResult) {
    for (path, value) in [
        ("noise_amplitude", config.noise_amplitude),
        ("tone_amplitude", config.tone_amplitude),
    ] {
        if !value.is_finite() || value < 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidAmplitude,
                format!("{} must be a non-negative number, got {}", path, value),
                path,
            ));
        }
    }
}

fn validate_filter(config: &RunConfig, result: &mut ValidationResult) {
    if let Err(mut err) = config.filter_spec().validate() {
        if err.path.is_none() {
            err.path = Some("cutoff_hz_1".to_string());
        }
        result.add_error(err);
    }
}

fn validate_noise_band(config: &RunConfig, result: &mut ValidationResult) {
    if let Err(mut err) = config.noise_band().validate(config.sample_rate) {
        err.path = Some("noise_min_hz".to_string());
        result.add_error(err);
    }
}

fn validate_tone(config: &RunConfig, result: &mut ValidationResult) {
    let nyquist = config.sample_rate as f64 / 2.0;
    if !config.tone_hz.is_finite() || config.tone_hz <= 0.0 || config.tone_hz >= nyquist {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidToneFrequency,
            format!(
                "tone_hz must be inside (0, {}) Hz, got {}",
                nyquist, config.tone_hz
            ),
            "tone_hz",
        ));
    }
}

fn check_warnings(config: &RunConfig, result: &mut ValidationResult) {
    let filter = config.filter_spec();
    let noise = config.noise_band();

    if filter.mode == FilterMode::Stopband && !filter.band().contains_band(&noise) {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NoiseOutsideFilterBand,
            format!(
                "noise band {} extends past the stopband {}; part of the noise will pass",
                noise,
                filter.band()
            ),
            "noise_min_hz",
        ));
    }

    if config.ripple_db < KAISER_MIN_RIPPLE_DB {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::RippleBelowKaiserRange,
            format!(
                "ripple_db {} is below {} dB; the filter order is computed as if it were {} dB",
                config.ripple_db, KAISER_MIN_RIPPLE_DB, KAISER_MIN_RIPPLE_DB
            ),
            "ripple_db",
        ));
    }
}
