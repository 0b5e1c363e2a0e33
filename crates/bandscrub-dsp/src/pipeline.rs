//! Noise injection and removal pipeline.
//!
//! Takes a clean signal, adds band-limited noise, designs a Kaiser FIR filter
//! for the given spec, filters the noisy signal and samples the filter's
//! magnitude response. Any stage failure aborts the run; there is no partial
//! result.

use bandscrub_spec::{FilterSpec, FrequencyBand};
use rand::Rng;

use crate::design::{FilterTaps, KaiserFirDesigner};
use crate::error::{DspError, DspResult};
use crate::fir::FirFilterEngine;
use crate::noise::SpectralNoiseSynthesizer;
use crate::response::FrequencyResponse;
use crate::rng::create_component_rng;
use crate::signal::Signal;

/// Seed derivation key for the noise phases.
pub const NOISE_SEED_KEY: &str = "noise";

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Intervals of the frequency response grid over `[0, Nyquist]`.
    pub response_points: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            response_points: 8000,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The injected noise, already scaled by the noise amplitude.
    pub noise: Signal,
    /// Clean signal plus noise.
    pub noisy: Signal,
    /// Filter output, same length as the input.
    pub filtered: Signal,
    /// Taps used for filtering.
    pub taps: FilterTaps,
    /// Group delay of the filter in seconds.
    pub delay_seconds: f64,
    /// First filtered sample unaffected by the startup transient.
    pub valid_from_index: usize,
    /// Magnitude response of the taps.
    pub frequency_response: FrequencyResponse,
}

impl PipelineResult {
    /// Filtered samples from `valid_from_index` on.
    pub fn valid_filtered(&self) -> &[f64] {
        let samples = self.filtered.samples();
        &samples[self.valid_from_index.min(samples.len())..]
    }
}

/// Runs synthesis, superposition, design and filtering end to end.
#[derive(Debug, Clone, Default)]
pub struct NoiseInjectionPipeline {
    options: PipelineOptions,
}

impl NoiseInjectionPipeline {
    /// Creates a pipeline with the given options.
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// The pipeline options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs the pipeline with noise phases drawn from `rng`.
    ///
    /// # Errors
    /// - `EmptyInput` if `clean` has no samples
    /// - `InvalidParameter` if `noise_amplitude` is negative or not finite
    /// - `SampleRateMismatch` if `filter_spec` targets another sample rate
    /// - `InvalidSpec` if the noise band or filter spec is malformed
    /// - `DimensionMismatch` if the noise and clean lengths disagree
    pub fn run<R: Rng + ?Sized>(
        &self,
        clean: &Signal,
        noise_band: &FrequencyBand,
        noise_amplitude: f64,
        filter_spec: &FilterSpec,
        rng: &mut R,
    ) -> DspResult<PipelineResult> {
        if clean.is_empty() {
            return Err(DspError::empty_input("clean signal has no samples"));
        }
        if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
            return Err(DspError::invalid_param(
                "noise_amplitude",
                format!("must be a non-negative number, got {}", noise_amplitude),
            ));
        }
        if filter_spec.sample_rate != clean.sample_rate() {
            return Err(DspError::SampleRateMismatch {
                expected: clean.sample_rate(),
                actual: filter_spec.sample_rate,
            });
        }

        let taps = KaiserFirDesigner::design(filter_spec)?;

        let noise = SpectralNoiseSynthesizer::synthesize(
            noise_band,
            clean.len(),
            clean.sample_rate(),
            rng,
        )?
        .scaled(noise_amplitude);
        let noisy = clean.mix(&noise, 1.0)?;

        let filtered = FirFilterEngine::apply(&taps, &noisy)?;
        let frequency_response = FrequencyResponse::compute(&taps, self.options.response_points)?;

        Ok(PipelineResult {
            noise,
            noisy,
            filtered: filtered.output,
            delay_seconds: taps.group_delay_seconds(),
            valid_from_index: filtered.valid_from_index,
            taps,
            frequency_response,
        })
    }

    /// Runs the pipeline with noise phases derived from `seed`.
    pub fn run_seeded(
        &self,
        clean: &Signal,
        noise_band: &FrequencyBand,
        noise_amplitude: f64,
        filter_spec: &FilterSpec,
        seed: u32,
    ) -> DspResult<PipelineResult> {
        let mut rng = create_component_rng(seed, NOISE_SEED_KEY);
        self.run(clean, noise_band, noise_amplitude, filter_spec, &mut rng)
    }
}
