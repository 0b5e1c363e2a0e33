//! Error types for configuration validation and loading.

use thiserror::Error;

/// Error codes for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Sample rate is zero
    InvalidSampleRate,
    /// E002: Duration is not a positive finite number
    InvalidDuration,
    /// E003: Frequency band is empty, inverted, negative or above Nyquist
    InvalidFrequencyBand,
    /// E004: Filter edges are non-positive, non-monotonic or above Nyquist
    InvalidFilterEdges,
    /// E005: Ripple tolerance is not a positive finite number of dB
    InvalidRipple,
    /// E006: Amplitude is negative or not finite
    InvalidAmplitude,
    /// E007: Frequency response point count is zero
    InvalidResponsePoints,
    /// E008: Synthetic tone frequency is outside (0, Nyquist)
    InvalidToneFrequency,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSampleRate => "E001",
            ErrorCode::InvalidDuration => "E002",
            ErrorCode::InvalidFrequencyBand => "E003",
            ErrorCode::InvalidFilterEdges => "E004",
            ErrorCode::InvalidRipple => "E005",
            ErrorCode::InvalidAmplitude => "E006",
            ErrorCode::InvalidResponsePoints => "E007",
            ErrorCode::InvalidToneFrequency => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Noise band is not inside the filter edges
    NoiseOutsideFilterBand,
    /// W002: Ripple below the range covered by the Kaiser order formula
    RippleBelowKaiserRange,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::NoiseOutsideFilterBand => "W001",
            WarningCode::RippleBelowKaiserRange => "W002",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the problematic field (e.g., "noise_min_hz").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning with a field path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for configuration operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Validation failed with one or more errors.
    #[error("config validation failed with {} error(s): {}", .0.len(), join_errors(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of configuration validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a validation result from collected errors and warnings.
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self { errors, warnings }
    }

    /// Adds an error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if validation passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a `Result`, discarding warnings.
    pub fn into_result(self) -> Result<(), SpecError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SpecError::ValidationFailed(self.errors))
        }
    }
}
