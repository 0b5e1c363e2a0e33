//! Bandscrub DSP core
//!
//! Band-limited noise synthesis and Kaiser windowed-sinc FIR filtering.
//!
//! # Overview
//!
//! - [`noise::SpectralNoiseSynthesizer`] builds real noise confined to a
//!   frequency band from a random-phase, conjugate-symmetric spectrum.
//! - [`design::KaiserFirDesigner`] turns a [`FilterSpec`] into taps, picking
//!   the length and window shape from the ripple and transition width.
//! - [`fir::FirFilterEngine`] applies taps causally and reports where the
//!   startup transient ends.
//! - [`pipeline::NoiseInjectionPipeline`] chains the three and samples the
//!   filter's frequency response.
//!
//! All randomness is injected: functions that need it take `&mut R` where
//! `R: rand::Rng`. [`rng`] builds reproducible PCG32 generators from a seed.
//!
//! # Example
//!
//! ```
//! use bandscrub_dsp::{NoiseInjectionPipeline, Signal};
//! use bandscrub_spec::{FilterSpec, FrequencyBand};
//!
//! let clean = Signal::sine(440.0, 0.5, 8000, 8000).unwrap();
//! let spec = FilterSpec::new(8000, 1000.0, 1400.0, 40.0);
//! let band = FrequencyBand::new(1150.0, 1250.0);
//!
//! let result = NoiseInjectionPipeline::default()
//!     .run_seeded(&clean, &band, 100.0, &spec, 42)
//!     .unwrap();
//! assert_eq!(result.filtered.len(), clean.len());
//! assert_eq!(result.valid_from_index, result.taps.len() - 1);
//! ```

pub mod design;
pub mod error;
pub mod fir;
pub mod kaiser;
pub mod noise;
pub mod pipeline;
pub mod response;
pub mod rng;
pub mod signal;
pub mod spectrum;
pub mod wav;

pub use bandscrub_spec::{FilterMode, FilterSpec, FrequencyBand};
pub use design::{FilterTaps, KaiserFirDesigner};
pub use error::{DspError, DspResult};
pub use fir::{FilterOutput, FirFilterEngine};
pub use noise::SpectralNoiseSynthesizer;
pub use pipeline::{NoiseInjectionPipeline, PipelineOptions, PipelineResult};
pub use response::{FrequencyResponse, ResponsePoint};
pub use signal::Signal;
