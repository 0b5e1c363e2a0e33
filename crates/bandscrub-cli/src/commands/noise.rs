//! Noise command implementation
//!
//! Synthesizes the configured band-limited noise on its own and writes it to
//! a WAV file. The phases are derived from the seed exactly as in `run`, so
//! the same seed reproduces the noise that a run injected.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bandscrub_dsp::pipeline::NOISE_SEED_KEY;
use bandscrub_dsp::rng::create_component_rng;
use bandscrub_dsp::wav::WavResult;
use bandscrub_dsp::{Signal, SpectralNoiseSynthesizer};
use bandscrub_spec::RunConfig;
use colored::Colorize;

use super::config_args::{resolve_seed, ConfigArgs};
use super::json_output::{
    error_codes, validation_error_to_json, validation_warning_to_json, warning_codes,
    CommandOutput, JsonError, JsonWarning, NoiseResult, OutputFile,
};
use super::report::{format_seed, print_validation};

/// Run the noise command
///
/// # Arguments
/// * `args` - Config file and flag overrides
/// * `output` - WAV path; defaults to `<output_dir>/noise_<min>_<max>.wav`
/// * `json` - Whether to output machine-readable JSON
pub fn run(args: &ConfigArgs, output: Option<&str>, json: bool) -> Result<ExitCode> {
    if json {
        run_json(args, output)
    } else {
        run_human(args, output)
    }
}

/// Synthesized noise and the seed that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedNoise {
    /// Noise scaled by the configured amplitude.
    pub signal: Signal,
    /// Run seed.
    pub seed: u32,
    /// True if the seed was drawn at random.
    pub seed_generated: bool,
}

/// Synthesizes `duration_seconds` of noise in the configured band.
pub fn generate(config: &RunConfig) -> Result<GeneratedNoise> {
    let (seed, seed_generated) = resolve_seed(config.seed);
    let mut rng = create_component_rng(seed, NOISE_SEED_KEY);
    let signal = SpectralNoiseSynthesizer::synthesize(
        &config.noise_band(),
        config.num_samples(),
        config.sample_rate,
        &mut rng,
    )
    .context("noise synthesis failed")?
    .scaled(config.noise_amplitude);

    Ok(GeneratedNoise {
        signal,
        seed,
        seed_generated,
    })
}

/// Where the noise is written when no path is given.
pub fn default_output_path(config: &RunConfig) -> PathBuf {
    Path::new(&config.output_dir).join(format!(
        "noise_{}_{}.wav",
        config.noise_min_hz, config.noise_max_hz
    ))
}

fn write(path: &Path, noise: &Signal) -> Result<OutputFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let wav = WavResult::from_signal(noise);
    wav.write_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(OutputFile {
        path: path.display().to_string(),
        pcm_hash: wav.pcm_hash,
    })
}

fn output_path(config: &RunConfig, output: Option<&str>) -> PathBuf {
    output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(config))
}

/// Run noise with colored human-readable output
fn run_human(args: &ConfigArgs, output: Option<&str>) -> Result<ExitCode> {
    let config = args.load()?;
    println!(
        "{} [{}, {}] Hz, {} s at {} Hz",
        "Noise:".cyan().bold(),
        config.noise_min_hz,
        config.noise_max_hz,
        config.duration_seconds,
        config.sample_rate
    );

    let validation = config.validate();
    print_validation(&validation);
    if !validation.is_ok() {
        println!(
            "\n{} Config has {} error(s)",
            "FAILED".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }

    let noise = generate(&config)?;
    println!(
        "{} {}",
        "Seed:".cyan().bold(),
        format_seed(noise.seed, noise.seed_generated)
    );
    println!("{} {:.4}", "Peak:".cyan().bold(), noise.signal.peak());
    if noise.signal.peak() > 1.0 {
        println!("  {} peak exceeds full scale; samples will be clipped", "!".yellow());
    }

    let file = write(&output_path(&config, output), &noise.signal)?;
    println!("{} {}", "Wrote:".cyan().bold(), file.path.dimmed());

    println!("\n{} Noise written", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Run noise with machine-readable JSON output
fn run_json(args: &ConfigArgs, output: Option<&str>) -> Result<ExitCode> {
    let config = match args.load() {
        Ok(config) => config,
        Err(e) => return fail(vec![JsonError::from_anyhow(error_codes::CONFIG_LOAD, &e)], vec![]),
    };

    let validation = config.validate();
    let mut warnings: Vec<JsonWarning> = validation
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();
    if !validation.is_ok() {
        let errors = validation.errors.iter().map(validation_error_to_json).collect();
        return fail(errors, warnings);
    }

    let noise = match generate(&config) {
        Ok(noise) => noise,
        Err(e) => return fail(vec![JsonError::from_anyhow(error_codes::PROCESSING, &e)], warnings),
    };
    let file = match write(&output_path(&config, output), &noise.signal) {
        Ok(file) => file,
        Err(e) => {
            return fail(vec![JsonError::from_anyhow(error_codes::OUTPUT_WRITE, &e)], warnings)
        }
    };

    let peak = noise.signal.peak();
    if peak > 1.0 {
        warnings.push(
            JsonWarning::new(
                warning_codes::CLIPPED,
                format!("peak {:.3} exceeds full scale; samples were clipped", peak),
            )
            .with_file(&file.path),
        );
    }

    let result = NoiseResult {
        seed: noise.seed,
        seed_generated: noise.seed_generated,
        min_hz: config.noise_min_hz,
        max_hz: config.noise_max_hz,
        peak,
        file,
    };
    CommandOutput::success(result, warnings).print()?;
    Ok(ExitCode::SUCCESS)
}

fn fail(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Result<ExitCode> {
    CommandOutput::<NoiseResult>::failure(errors, warnings).print()?;
    Ok(ExitCode::from(1))
}
