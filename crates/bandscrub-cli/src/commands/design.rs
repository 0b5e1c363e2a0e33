//! Design command implementation
//!
//! Designs the Kaiser FIR filter for a config without running the pipeline,
//! and optionally writes the taps and frequency response as JSON.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bandscrub_dsp::{FilterTaps, FrequencyResponse, KaiserFirDesigner};
use bandscrub_spec::RunConfig;
use colored::Colorize;
use serde::Serialize;

use super::config_args::ConfigArgs;
use super::json_output::{
    error_codes, validation_error_to_json, validation_warning_to_json, CommandOutput,
    DesignResult, JsonError, JsonWarning,
};
use super::report::{format_db, print_validation};

/// Run the design command
///
/// # Arguments
/// * `args` - Config file and flag overrides
/// * `taps_out` - Optional path for the taps JSON
/// * `response_out` - Optional path for the frequency response JSON
/// * `json` - Whether to output machine-readable JSON
pub fn run(
    args: &ConfigArgs,
    taps_out: Option<&str>,
    response_out: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    if json {
        run_json(args, taps_out, response_out)
    } else {
        run_human(args, taps_out, response_out)
    }
}

/// A designed filter with its sampled response.
#[derive(Debug, Clone)]
pub struct Design {
    /// The taps.
    pub taps: FilterTaps,
    /// Magnitude response on the config's grid.
    pub response: FrequencyResponse,
}

impl Design {
    /// Gain at the midpoint of the filter edges, in dB.
    pub fn center_gain_db(&self, config: &RunConfig) -> f64 {
        let center = config.filter_spec().band().center();
        let magnitude = self
            .response
            .nearest(center)
            .map(|p| p.magnitude)
            .unwrap_or(0.0);
        20.0 * magnitude.log10()
    }
}

/// Designs the filter and samples its response.
pub fn design(config: &RunConfig) -> Result<Design> {
    let taps =
        KaiserFirDesigner::design(&config.filter_spec()).context("filter design failed")?;
    let response = FrequencyResponse::compute(&taps, config.response_points)
        .context("frequency response failed")?;
    Ok(Design { taps, response })
}

fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path))
}

/// Writes whichever of the taps and response files were requested.
fn write_files(
    design: &Design,
    taps_out: Option<&str>,
    response_out: Option<&str>,
) -> Result<()> {
    if let Some(path) = taps_out {
        write_json(path, &design.taps)?;
    }
    if let Some(path) = response_out {
        write_json(path, &design.response)?;
    }
    Ok(())
}

/// Run design with colored human-readable output
fn run_human(
    args: &ConfigArgs,
    taps_out: Option<&str>,
    response_out: Option<&str>,
) -> Result<ExitCode> {
    let config = args.load()?;
    let spec = config.filter_spec();
    println!(
        "{} {} {}-{} Hz, {} dB at {} Hz",
        "Designing:".cyan().bold(),
        spec.mode.as_str(),
        spec.edge_low_hz,
        spec.edge_high_hz,
        spec.ripple_db,
        spec.sample_rate
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

    let design = design(&config)?;
    let taps = &design.taps;
    println!("{} {}", "Taps:".cyan().bold(), taps.len());
    println!("{} {:.4}", "Beta:".cyan().bold(), taps.beta());
    println!(
        "{} {} samples ({:.3} ms)",
        "Delay:".cyan().bold(),
        taps.group_delay_samples(),
        taps.group_delay_seconds() * 1000.0
    );
    println!("{} {} Hz", "Transition:".cyan().bold(), spec.band().width());
    println!(
        "{} {}",
        "Centre gain:".cyan().bold(),
        format_db(design.center_gain_db(&config))
    );

    write_files(&design, taps_out, response_out)?;
    for path in taps_out.into_iter().chain(response_out) {
        println!("  {} {}", "Wrote".dimmed(), path.dimmed());
    }

    println!("\n{} Filter designed", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Run design with machine-readable JSON output
fn run_json(
    args: &ConfigArgs,
    taps_out: Option<&str>,
    response_out: Option<&str>,
) -> Result<ExitCode> {
    let config = match args.load() {
        Ok(config) => config,
        Err(e) => {
            return fail(
                vec![JsonError::from_anyhow(error_codes::CONFIG_LOAD, &e)],
                vec![],
            )
        }
    };

    let validation = config.validate();
    let warnings: Vec<JsonWarning> = validation
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();
    if !validation.is_ok() {
        let errors = validation.errors.iter().map(validation_error_to_json).collect();
        return fail(errors, warnings);
    }

    let design = match design(&config) {
        Ok(design) => design,
        Err(e) => {
            return fail(
                vec![JsonError::from_anyhow(error_codes::PROCESSING, &e)],
                warnings,
            )
        }
    };
    if let Err(e) = write_files(&design, taps_out, response_out) {
        return fail(
            vec![JsonError::from_anyhow(error_codes::OUTPUT_WRITE, &e)],
            warnings,
        );
    }

    let spec = config.filter_spec();
    let result = DesignResult {
        mode: spec.mode.as_str().to_string(),
        num_taps: design.taps.len(),
        beta: design.taps.beta(),
        delay_samples: design.taps.group_delay_samples(),
        delay_seconds: design.taps.group_delay_seconds(),
        transition_width_hz: spec.band().width(),
        center_gain_db: design.center_gain_db(&config),
        taps_file: taps_out.map(str::to_string),
        response_file: response_out.map(str::to_string),
    };
    CommandOutput::success(result, warnings).print()?;
    Ok(ExitCode::SUCCESS)
}

fn fail(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Result<ExitCode> {
    CommandOutput::<DesignResult>::failure(errors, warnings).print()?;
    Ok(ExitCode::from(1))
}
