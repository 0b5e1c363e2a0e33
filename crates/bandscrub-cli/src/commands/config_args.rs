//! Run configuration loading shared by the subcommands.
//!
//! A config is built in three layers: [`RunConfig`] defaults, an optional
//! JSON file given with `--config`, then any explicit flags.

use std::path::Path;

use anyhow::{Context, Result};
use bandscrub_dsp::rng::random_seed;
use bandscrub_spec::{FilterMode, RunConfig, WindowKind};
use clap::Args;

/// Flags that override fields of a [`RunConfig`].
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct ConfigArgs {
    /// JSON config file (missing fields take their defaults)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Signal duration in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Lower filter edge in Hz
    #[arg(long)]
    pub cutoff_low: Option<f64>,

    /// Upper filter edge in Hz
    #[arg(long)]
    pub cutoff_high: Option<f64>,

    /// Stopband attenuation in dB
    #[arg(long)]
    pub ripple_db: Option<f64>,

    /// Filter pass policy (stopband or passband)
    #[arg(long)]
    pub mode: Option<FilterMode>,

    /// Design window (kaiser)
    #[arg(short, long)]
    pub window: Option<WindowKind>,

    /// Lower edge of the injected noise band in Hz
    #[arg(long)]
    pub noise_min: Option<f64>,

    /// Upper edge of the injected noise band in Hz
    #[arg(long)]
    pub noise_max: Option<f64>,

    /// Scale applied to the synthesized noise
    #[arg(long)]
    pub noise_amplitude: Option<f64>,

    /// Seed for the noise phases (random when omitted)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Frequency of the synthetic test tone in Hz
    #[arg(long)]
    pub tone_hz: Option<f64>,

    /// Peak amplitude of the synthetic test tone
    #[arg(long)]
    pub tone_amplitude: Option<f64>,

    /// Directory outputs are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Number of frequency response intervals over [0, Nyquist]
    #[arg(long)]
    pub response_points: Option<usize>,
}

impl ConfigArgs {
    /// Loads the config file (if any) and applies the flag overrides.
    pub fn load(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(Path::new(path))
                .with_context(|| format!("failed to load config {}", path))?,
            None => RunConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Writes every flag that was given into `config`.
    pub fn apply(&self, config: &mut RunConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut config.duration_seconds, &self.duration);
        set(&mut config.sample_rate, &self.sample_rate);
        set(&mut config.cutoff_hz_1, &self.cutoff_low);
        set(&mut config.cutoff_hz_2, &self.cutoff_high);
        set(&mut config.ripple_db, &self.ripple_db);
        set(&mut config.filter_mode, &self.mode);
        set(&mut config.window, &self.window);
        set(&mut config.noise_min_hz, &self.noise_min);
        set(&mut config.noise_max_hz, &self.noise_max);
        set(&mut config.noise_amplitude, &self.noise_amplitude);
        set(&mut config.tone_hz, &self.tone_hz);
        set(&mut config.tone_amplitude, &self.tone_amplitude);
        set(&mut config.output_dir, &self.output_dir);
        set(&mut config.response_points, &self.response_points);
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

/// Returns the configured seed, or draws one. The flag is true when drawn.
pub fn resolve_seed(seed: Option<u32>) -> (u32, bool) {
    match seed {
        Some(seed) => (seed, false),
        None => (random_seed(), true),
    }
}
