//! Run command implementation
//!
//! Injects band-limited noise into a clean signal, filters it with a Kaiser
//! FIR notch, and writes the three signals plus the filter's frequency
//! response to the output directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bandscrub_dsp::spectrum::{attenuation_db, band_energy_of};
use bandscrub_dsp::wav::{read_wav, WavResult};
use bandscrub_dsp::{
    FilterTaps, FrequencyResponse, NoiseInjectionPipeline, PipelineOptions, PipelineResult, Signal,
};
use bandscrub_spec::RunConfig;
use colored::Colorize;
use serde::Serialize;

use super::config_args::{resolve_seed, ConfigArgs};
use super::json_output::{
    error_codes, finite_or_none, validation_error_to_json, validation_warning_to_json,
    warning_codes, CommandOutput, JsonError, JsonWarning, OutputFile, RunFiles, RunResult,
};
use super::report::{format_db, format_seed, print_validation};

/// Run the noise injection and filtering pipeline
///
/// # Arguments
/// * `args` - Config file and flag overrides
/// * `input` - Optional WAV file to use as the clean signal
/// * `play` - Overrides the config's playback setting when given
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 config or processing error
pub fn run(
    args: &ConfigArgs,
    input: Option<&str>,
    play: Option<bool>,
    json: bool,
) -> Result<ExitCode> {
    if json {
        run_json(args, input, play)
    } else {
        run_human(args, input, play)
    }
}

/// A completed pipeline run, before anything is written.
#[derive(Debug, Clone)]
pub struct ProcessedRun {
    /// Seed the noise phases were derived from.
    pub seed: u32,
    /// True if the seed was drawn at random.
    pub seed_generated: bool,
    /// Everything the pipeline produced.
    pub result: PipelineResult,
}

impl ProcessedRun {
    /// Reduction of noise-band energy from the noisy to the filtered signal,
    /// measured after the startup transient. `None` if no sample is valid.
    pub fn noise_band_attenuation_db(&self, config: &RunConfig) -> Option<f64> {
        let start = self.result.valid_from_index;
        let noisy = self.result.noisy.samples();
        if start >= noisy.len() {
            return None;
        }
        let band = config.noise_band();
        let rate = self.result.noisy.sample_rate();
        let before = band_energy_of(&noisy[start..], rate, &band);
        let after = band_energy_of(self.result.valid_filtered(), rate, &band);
        Some(attenuation_db(before, after))
    }
}

/// Loads the config and applies the `--play`/`--no-play` override.
pub fn load_config(args: &ConfigArgs, play: Option<bool>) -> Result<RunConfig> {
    let mut config = args.load()?;
    if let Some(play) = play {
        config.play = play;
    }
    Ok(config)
}

/// Reads a WAV file to use as the clean signal.
pub fn read_input(path: &str) -> Result<Signal> {
    read_wav(Path::new(path)).with_context(|| format!("failed to read input {}", path))
}

/// The clean signal: the input file if given, else the configured tone.
pub fn clean_signal(config: &RunConfig, input: Option<Signal>) -> Result<Signal> {
    match input {
        Some(signal) => Ok(signal),
        None => Signal::sine(
            config.tone_hz,
            config.tone_amplitude,
            config.num_samples(),
            config.sample_rate,
        )
        .context("failed to synthesize test tone"),
    }
}

/// Runs the pipeline on `clean` with the config's seed, or a fresh one.
pub fn process(config: &RunConfig, clean: &Signal) -> Result<ProcessedRun> {
    let (seed, seed_generated) = resolve_seed(config.seed);
    let pipeline = NoiseInjectionPipeline::new(PipelineOptions {
        response_points: config.response_points,
    });
    let result = pipeline
        .run_seeded(
            clean,
            &config.noise_band(),
            config.noise_amplitude,
            &config.filter_spec(),
            seed,
        )
        .context("noise injection pipeline failed")?;

    Ok(ProcessedRun {
        seed,
        seed_generated,
        result,
    })
}

/// Frequency response file contents.
#[derive(Debug, Serialize)]
struct ResponseDocument<'a> {
    seed: u32,
    sample_rate: u32,
    mode: &'static str,
    cutoff_hz_1: f64,
    cutoff_hz_2: f64,
    ripple_db: f64,
    num_taps: usize,
    beta: f64,
    delay_seconds: f64,
    valid_from_index: usize,
    taps: &'a [f64],
    frequency_response: &'a FrequencyResponse,
}

/// Writes the clean, noisy and filtered WAVs and the response JSON.
pub fn write_outputs(config: &RunConfig, clean: &Signal, run: &ProcessedRun) -> Result<RunFiles> {
    let dir = Path::new(&config.output_dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let prefix = config.file_prefix();
    let result = &run.result;

    let clean_file = write_wav(dir.join(format!("{}_output.wav", prefix)), clean)?;
    let noisy_file = write_wav(dir.join(format!("{}_with_noise.wav", prefix)), &result.noisy)?;
    let filtered_file = write_wav(dir.join(format!("{}_filtered.wav", prefix)), &result.filtered)?;

    let response_path = dir.join(format!("{}_response.json", prefix));
    let document = response_document(config, run.seed, &result.taps, result);
    let json = serde_json::to_string_pretty(&document).context("failed to serialize response")?;
    fs::write(&response_path, json)
        .with_context(|| format!("failed to write {}", response_path.display()))?;

    Ok(RunFiles {
        clean: clean_file,
        noisy: noisy_file,
        filtered: filtered_file,
        response: response_path.display().to_string(),
    })
}

fn response_document<'a>(
    config: &RunConfig,
    seed: u32,
    taps: &'a FilterTaps,
    result: &'a PipelineResult,
) -> ResponseDocument<'a> {
    ResponseDocument {
        seed,
        sample_rate: taps.sample_rate(),
        mode: config.filter_mode.as_str(),
        cutoff_hz_1: config.cutoff_hz_1,
        cutoff_hz_2: config.cutoff_hz_2,
        ripple_db: config.ripple_db,
        num_taps: taps.len(),
        beta: taps.beta(),
        delay_seconds: result.delay_seconds,
        valid_from_index: result.valid_from_index,
        taps: taps.coefficients(),
        frequency_response: &result.frequency_response,
    }
}

fn write_wav(path: PathBuf, signal: &Signal) -> Result<OutputFile> {
    let wav = WavResult::from_signal(signal);
    wav.write_to(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(OutputFile {
        path: path.display().to_string(),
        pcm_hash: wav.pcm_hash,
    })
}

/// Warnings for every output that exceeds full scale.
fn clipping_warnings(clean: &Signal, run: &ProcessedRun, files: &RunFiles) -> Vec<JsonWarning> {
    [
        (clean, &files.clean),
        (&run.result.noisy, &files.noisy),
        (&run.result.filtered, &files.filtered),
    ]
    .into_iter()
    .filter(|(signal, _)| signal.peak() > 1.0)
    .map(|(signal, file)| {
        JsonWarning::new(
            warning_codes::CLIPPED,
            format!("peak {:.3} exceeds full scale; samples were clipped", signal.peak()),
        )
        .with_file(&file.path)
    })
    .collect()
}

/// Opens the noisy and filtered files with the default player.
fn play(files: &RunFiles) -> Vec<JsonWarning> {
    [&files.noisy, &files.filtered]
        .into_iter()
        .filter_map(|file| {
            open::that(&file.path).err().map(|e| {
                JsonWarning::new(warning_codes::PLAYBACK, format!("could not open player: {}", e))
                    .with_file(&file.path)
            })
        })
        .collect()
}

fn config_hash(config: &RunConfig) -> Result<String> {
    let json = config.to_json_pretty().context("failed to serialize config")?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

/// Run with colored human-readable output
fn run_human(args: &ConfigArgs, input: Option<&str>, play_flag: Option<bool>) -> Result<ExitCode> {
    let mut config = load_config(args, play_flag)?;

    let input_signal = match input {
        Some(path) => {
            println!("{} {}", "Input:".cyan().bold(), path);
            let signal = read_input(path)?;
            config.sample_rate = signal.sample_rate();
            Some(signal)
        }
        None => {
            println!(
                "{} {} Hz tone, {} s",
                "Input:".cyan().bold(),
                config.tone_hz,
                config.duration_seconds
            );
            None
        }
    };

    let validation = config.validate();
    if !validation.is_ok() {
        print_validation(&validation);
        println!(
            "\n{} Config has {} error(s)",
            "FAILED".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }
    print_validation(&validation);

    let clean = clean_signal(&config, input_signal)?;
    println!(
        "{} [{}, {}] Hz at amplitude {}",
        "Noise:".cyan().bold(),
        config.noise_min_hz,
        config.noise_max_hz,
        config.noise_amplitude
    );

    let processed = process(&config, &clean)?;
    let result = &processed.result;
    println!(
        "{} {}",
        "Seed:".cyan().bold(),
        format_seed(processed.seed, processed.seed_generated)
    );
    println!(
        "{} {} {}-{} Hz, {} taps, beta {:.3}",
        "Filter:".cyan().bold(),
        config.filter_mode.as_str(),
        config.cutoff_hz_1,
        config.cutoff_hz_2,
        result.taps.len(),
        result.taps.beta()
    );
    println!(
        "  {}",
        format!(
            "delay {:.2} ms, first valid sample {}",
            result.delay_seconds * 1000.0,
            result.valid_from_index
        )
        .dimmed()
    );

    match processed.noise_band_attenuation_db(&config) {
        Some(db) => println!("{} {}", "Noise band attenuation:".cyan().bold(), format_db(db)),
        None => println!(
            "  {} signal is shorter than the filter; no valid output",
            "!".yellow()
        ),
    }

    let files = write_outputs(&config, &clean, &processed)?;
    println!("{}", "Wrote:".cyan().bold());
    for path in [
        &files.clean.path,
        &files.noisy.path,
        &files.filtered.path,
        &files.response,
    ] {
        println!("  {}", path.dimmed());
    }

    let mut warnings = clipping_warnings(&clean, &processed, &files);
    if config.play {
        warnings.extend(play(&files));
    }
    for warning in &warnings {
        let file = warning.file.as_deref().unwrap_or_default();
        println!("  {} {} ({})", "!".yellow(), warning.message, file);
    }

    println!("\n{} Run complete", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Run with machine-readable JSON output
fn run_json(args: &ConfigArgs, input: Option<&str>, play_flag: Option<bool>) -> Result<ExitCode> {
    let mut config = match load_config(args, play_flag) {
        Ok(config) => config,
        Err(e) => return fail(vec![JsonError::from_anyhow(error_codes::CONFIG_LOAD, &e)], vec![]),
    };

    let input_signal = match input {
        Some(path) => match read_input(path) {
            Ok(signal) => {
                config.sample_rate = signal.sample_rate();
                Some(signal)
            }
            Err(e) => {
                let error = JsonError::from_anyhow(error_codes::INPUT_READ, &e).with_file(path);
                return fail(vec![error], vec![]);
            }
        },
        None => None,
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

    let processed = match clean_signal(&config, input_signal)
        .and_then(|clean| process(&config, &clean).map(|run| (clean, run)))
    {
        Ok(done) => done,
        Err(e) => {
            return fail(vec![JsonError::from_anyhow(error_codes::PROCESSING, &e)], warnings)
        }
    };
    let (clean, processed) = processed;

    let files = match write_outputs(&config, &clean, &processed) {
        Ok(files) => files,
        Err(e) => {
            return fail(vec![JsonError::from_anyhow(error_codes::OUTPUT_WRITE, &e)], warnings)
        }
    };

    warnings.extend(clipping_warnings(&clean, &processed, &files));
    if config.play {
        warnings.extend(play(&files));
    }

    let result = &processed.result;
    let output = RunResult {
        seed: processed.seed,
        seed_generated: processed.seed_generated,
        config_hash: config_hash(&config)?,
        sample_rate: clean.sample_rate(),
        num_samples: clean.len(),
        num_taps: result.taps.len(),
        beta: result.taps.beta(),
        delay_seconds: result.delay_seconds,
        valid_from_index: result.valid_from_index,
        noise_band_attenuation_db: processed
            .noise_band_attenuation_db(&config)
            .and_then(finite_or_none),
        files,
    };
    CommandOutput::success(output, warnings).print()?;
    Ok(ExitCode::SUCCESS)
}

fn fail(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Result<ExitCode> {
    CommandOutput::<RunResult>::failure(errors, warnings).print()?;
    Ok(ExitCode::from(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(dir: &Path) -> RunConfig {
        RunConfig {
            duration_seconds: 0.5,
            sample_rate: 8000,
            cutoff_hz_1: 1000.0,
            cutoff_hz_2: 1400.0,
            ripple_db: 40.0,
            noise_min_hz: 1150.0,
            noise_max_hz: 1250.0,
            noise_amplitude: 100.0,
            seed: Some(42),
            tone_hz: 300.0,
            play: false,
            output_dir: dir.display().to_string(),
            response_points: 256,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_process_attenuates_noise_band() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());
        let clean = clean_signal(&config, None).unwrap();
        let run = process(&config, &clean).unwrap();

        assert_eq!(run.seed, 42);
        assert!(!run.seed_generated);
        assert_eq!(run.result.taps.len(), 47);
        let db = run.noise_band_attenuation_db(&config).unwrap();
        assert!(db > 15.0, "attenuation {}", db);
    }

    #[test]
    fn test_random_seed_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            seed: None,
            ..quick_config(dir.path())
        };
        let clean = clean_signal(&config, None).unwrap();
        let run = process(&config, &clean).unwrap();
        assert!(run.seed_generated);

        // Replaying the reported seed reproduces the run.
        let replay = RunConfig {
            seed: Some(run.seed),
            ..config
        };
        let again = process(&replay, &clean).unwrap();
        assert_eq!(again.result.filtered, run.result.filtered);
    }

    #[test]
    fn test_write_outputs_names_files_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let config = quick_config(dir.path());
        let clean = clean_signal(&config, None).unwrap();
        let run = process(&config, &clean).unwrap();
        let files = write_outputs(&config, &clean, &run).unwrap();

        let prefix = "noise_1150_1250_1000_1400_40";
        for suffix in ["output.wav", "with_noise.wav", "filtered.wav", "response.json"] {
            let path = dir.path().join(format!("{}_{}", prefix, suffix));
            assert!(path.exists(), "missing {}", path.display());
        }
        assert!(files.filtered.path.ends_with("_filtered.wav"));

        let text = fs::read_to_string(&files.response).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["num_taps"], 47);
        assert_eq!(doc["valid_from_index"], 46);
        assert_eq!(doc["mode"], "stopband");
        assert_eq!(doc["frequency_response"]["points"].as_array().unwrap().len(), 257);
    }

    #[test]
    fn test_input_replaces_tone() {
        let input = Signal::silence(100, 8000).unwrap();
        let config = RunConfig::default();
        let clean = clean_signal(&config, Some(input.clone())).unwrap();
        assert_eq!(clean, input);
    }

    #[test]
    fn test_play_flag_overrides_config() {
        let config = load_config(&ConfigArgs::default(), Some(false)).unwrap();
        assert!(!config.play);
        let config = load_config(&ConfigArgs::default(), None).unwrap();
        assert!(config.play);
    }
}
