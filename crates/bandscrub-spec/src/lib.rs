//! Bandscrub configuration library
//!
//! Types and validation for band-limited noise injection runs. A run is
//! described by a [`RunConfig`]: the noise band to inject, the Kaiser FIR
//! filter used to remove it, and the signal and output settings around them.
//!
//! # Example
//!
//! ```
//! use bandscrub_spec::{FilterMode, RunConfig};
//!
//! let config = RunConfig::from_json(r#"{"seed": 42, "filter_mode": "stopband"}"#).unwrap();
//! assert_eq!(config.filter_mode, FilterMode::Stopband);
//!
//! let result = config.validate();
//! assert!(result.is_ok());
//!
//! let spec = config.filter_spec();
//! assert_eq!(spec.edge_low_hz, 1900.0);
//! ```
//!
//! # Modules
//!
//! - [`band`]: Frequency band type
//! - [`config`]: Run configuration with JSON defaults
//! - [`error`]: Error and warning types for validation
//! - [`filter`]: Filter design parameters
//! - [`validation`]: Config validation

pub mod band;
pub mod config;
pub mod error;
pub mod filter;
pub mod validation;

pub use band::FrequencyBand;
pub use config::RunConfig;
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use filter::{FilterMode, FilterSpec, WindowKind};
