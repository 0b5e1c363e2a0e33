//! Shared scenarios and scratch directories.

use std::path::{Path, PathBuf};

use bandscrub_cli::commands::config_args::ConfigArgs;
use bandscrub_dsp::{
    FilterSpec, FrequencyBand, NoiseInjectionPipeline, PipelineOptions, PipelineResult, Signal,
};
use tempfile::TempDir;

/// Sample rate of the reference scenarios.
pub const SAMPLE_RATE: u32 = 44100;

/// The default notch: 1900-2100 Hz, 60 dB.
pub fn default_filter() -> FilterSpec {
    FilterSpec::new(SAMPLE_RATE, 1900.0, 2100.0, 60.0)
}

/// The default injected band: 1950-2050 Hz.
pub fn default_noise_band() -> FrequencyBand {
    FrequencyBand::new(1950.0, 2050.0)
}

/// One second of a sine at `frequency_hz`.
pub fn tone(frequency_hz: f64, amplitude: f64) -> Signal {
    Signal::sine(frequency_hz, amplitude, SAMPLE_RATE as usize, SAMPLE_RATE)
        .expect("tone parameters are valid")
}

/// A clean signal, the noise to inject, and the filter to remove it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub clean: Signal,
    pub noise_band: FrequencyBand,
    pub noise_amplitude: f64,
    pub filter: FilterSpec,
}

impl Scenario {
    /// A one-second tone with the default noise band and notch.
    pub fn tone_with_noise(tone_hz: f64, noise_amplitude: f64) -> Self {
        Self {
            clean: tone(tone_hz, 0.5),
            noise_band: default_noise_band(),
            noise_amplitude,
            filter: default_filter(),
        }
    }

    /// Runs the pipeline with `seed`.
    pub fn run(&self, seed: u32) -> PipelineResult {
        NoiseInjectionPipeline::new(PipelineOptions {
            response_points: 1024,
        })
        .run_seeded(
            &self.clean,
            &self.noise_band,
            self.noise_amplitude,
            &self.filter,
            seed,
        )
        .expect("scenario is valid")
    }

    /// Clean samples from the first transient-free filtered index on.
    pub fn clean_valid<'a>(&'a self, result: &PipelineResult) -> &'a [f64] {
        &self.clean.samples()[result.valid_from_index..]
    }
}

/// A temporary output directory for CLI runs.
pub struct OutputDirFixture {
    pub root: TempDir,
}

impl OutputDirFixture {
    /// Creates an empty scratch directory.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Flags for a short, seeded 8 kHz run that writes into this directory.
    pub fn quick_args(&self, seed: u32) -> ConfigArgs {
        ConfigArgs {
            duration: Some(0.5),
            sample_rate: Some(8000),
            cutoff_low: Some(1000.0),
            cutoff_high: Some(1400.0),
            ripple_db: Some(40.0),
            noise_min: Some(1150.0),
            noise_max: Some(1250.0),
            noise_amplitude: Some(100.0),
            seed: Some(seed),
            tone_hz: Some(300.0),
            output_dir: Some(self.path().display().to_string()),
            response_points: Some(256),
            ..ConfigArgs::default()
        }
    }
}

impl Default for OutputDirFixture {
    fn default() -> Self {
        Self::new()
    }
}
