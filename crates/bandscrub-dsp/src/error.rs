//! Error types for the DSP core.

use bandscrub_spec::ValidationError;
use thiserror::Error;

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur while synthesizing, designing or filtering.
#[derive(Debug, Error)]
pub enum DspError {
    /// A band or filter spec violates its invariants.
    #[error("invalid spec: {0}")]
    InvalidSpec(ValidationError),

    /// An input signal (or requested length) is empty.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty.
        context: String,
    },

    /// A filter has no coefficients.
    #[error("filter taps are empty")]
    EmptyTaps,

    /// Two signals that must line up have different lengths.
    #[error("dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Two inputs that must share a sample rate do not.
    #[error("sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch {
        /// Expected rate.
        expected: u32,
        /// Actual rate.
        actual: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// WAV decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    /// Creates an empty input error.
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the stable error code (e.g., "DSP_001").
    pub fn code(&self) -> &'static str {
        match self {
            DspError::InvalidSpec(_) => "DSP_001",
            DspError::EmptyInput { .. } => "DSP_002",
            DspError::EmptyTaps => "DSP_003",
            DspError::DimensionMismatch { .. } => "DSP_004",
            DspError::SampleRateMismatch { .. } => "DSP_005",
            DspError::InvalidParameter { .. } => "DSP_006",
            DspError::Wav(_) => "DSP_007",
            DspError::Io(_) => "DSP_008",
        }
    }
}

impl From<ValidationError> for DspError {
    fn from(err: ValidationError) -> Self {
        DspError::InvalidSpec(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscrub_spec::ErrorCode;

    #[test]
    fn test_invalid_param_helper() {
        let err = DspError::invalid_param("noise_amplitude", "must be finite");
        assert!(err.to_string().contains("noise_amplitude"));
        assert!(err.to_string().contains("must be finite"));
        assert_eq!(err.code(), "DSP_006");
    }

    #[test]
    fn test_validation_error_converts_to_invalid_spec() {
        let err: DspError =
            ValidationError::new(ErrorCode::InvalidFilterEdges, "edges inverted").into();
        assert_eq!(err.code(), "DSP_001");
        assert_eq!(err.to_string(), "invalid spec: E004: edges inverted");
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            DspError::empty_input("signal"),
            DspError::EmptyTaps,
            DspError::DimensionMismatch {
                expected: 1,
                actual: 2,
            },
            DspError::SampleRateMismatch {
                expected: 44100,
                actual: 48000,
            },
        ];
        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["DSP_002", "DSP_003", "DSP_004", "DSP_005"]);
    }
}
