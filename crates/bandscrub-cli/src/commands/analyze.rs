//! Analyze command implementation
//!
//! Measures how much of a WAV file's energy lies in a frequency band, and
//! optionally how much quieter that band is than in a reference file.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use bandscrub_dsp::spectrum::{attenuation_db, band_energy, total_energy};
use bandscrub_dsp::wav::read_wav;
use bandscrub_dsp::{FrequencyBand, Signal};
use colored::Colorize;

use super::json_output::{
    error_codes, validation_error_to_json, AnalyzeResult, CommandOutput, JsonError,
};
use super::report::format_db;

/// Run the analyze command
///
/// # Arguments
/// * `input` - WAV file to analyze
/// * `band` - Band to measure
/// * `reference` - Optional WAV file to compare the band energy against
/// * `json` - Whether to output machine-readable JSON
pub fn run(
    input: &str,
    band: &FrequencyBand,
    reference: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    if json {
        run_json(input, band, reference)
    } else {
        run_human(input, band, reference)
    }
}

/// Band and total energy of one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMeasurement {
    /// Energy inside the band.
    pub band_energy: f64,
    /// Energy over all frequencies.
    pub total_energy: f64,
}

impl BandMeasurement {
    /// Measures `signal` over `band`.
    pub fn of(signal: &Signal, band: &FrequencyBand) -> Self {
        Self {
            band_energy: band_energy(signal, band),
            total_energy: total_energy(signal),
        }
    }

    /// Band energy relative to the total, in dB (at most 0).
    pub fn band_share_db(&self) -> f64 {
        -attenuation_db(self.total_energy, self.band_energy)
    }
}

fn load(path: &str) -> Result<Signal> {
    read_wav(Path::new(path)).with_context(|| format!("failed to read {}", path))
}

/// Loads the reference and checks it is comparable with the input.
fn load_reference(path: &str, input: &Signal) -> Result<Signal> {
    let reference = load(path)?;
    if reference.sample_rate() != input.sample_rate() {
        bail!(
            "reference {} is {} Hz but input is {} Hz",
            path,
            reference.sample_rate(),
            input.sample_rate()
        );
    }
    Ok(reference)
}

/// Run analyze with colored human-readable output
fn run_human(input: &str, band: &FrequencyBand, reference: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Analyzing:".cyan().bold(), input);

    let signal = load(input)?;
    band.validate(signal.sample_rate())
        .context("band does not fit the input's sample rate")?;

    println!(
        "  {}",
        format!(
            "{} Hz, {} samples, {:.3} s",
            signal.sample_rate(),
            signal.len(),
            signal.duration_seconds()
        )
        .dimmed()
    );

    let measurement = BandMeasurement::of(&signal, band);
    println!("{} {:.4}", "Peak:".cyan().bold(), signal.peak());
    println!("{} {:.6}", "Total energy:".cyan().bold(), measurement.total_energy);
    println!(
        "{} {:.6} ({} of total)",
        format!("Band {} energy:", band).cyan().bold(),
        measurement.band_energy,
        format_db(measurement.band_share_db())
    );

    if let Some(path) = reference {
        let reference = load_reference(path, &signal)?;
        let before = band_energy(&reference, band);
        println!(
            "{} {} relative to {}",
            "Band attenuation:".cyan().bold(),
            format_db(attenuation_db(before, measurement.band_energy)),
            path
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Run analyze with machine-readable JSON output
fn run_json(input: &str, band: &FrequencyBand, reference: Option<&str>) -> Result<ExitCode> {
    let signal = match load(input) {
        Ok(signal) => signal,
        Err(e) => {
            let error = JsonError::from_anyhow(error_codes::INPUT_READ, &e).with_file(input);
            return fail(vec![error]);
        }
    };
    if let Err(e) = band.validate(signal.sample_rate()) {
        return fail(vec![validation_error_to_json(&e).with_file(input)]);
    }

    let measurement = BandMeasurement::of(&signal, band);

    let attenuation = match reference {
        Some(path) => match load_reference(path, &signal) {
            Ok(reference) => Some(attenuation_db(
                band_energy(&reference, band),
                measurement.band_energy,
            )),
            Err(e) => {
                let error =
                    JsonError::from_anyhow(error_codes::INVALID_ARGUMENT, &e).with_file(path);
                return fail(vec![error]);
            }
        },
        None => None,
    };

    let result = AnalyzeResult {
        file: input.to_string(),
        sample_rate: signal.sample_rate(),
        num_samples: signal.len(),
        duration_seconds: signal.duration_seconds(),
        peak: signal.peak(),
        total_energy: measurement.total_energy,
        band_energy: measurement.band_energy,
        band_share_db: measurement.band_share_db(),
        attenuation_db: attenuation,
    };
    CommandOutput::success(result, vec![]).print()?;
    Ok(ExitCode::SUCCESS)
}

fn fail(errors: Vec<JsonError>) -> Result<ExitCode> {
    CommandOutput::<AnalyzeResult>::failure(errors, vec![]).print()?;
    Ok(ExitCode::from(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscrub_dsp::wav::WavResult;

    #[test]
    fn test_band_share_of_pure_tone() {
        let tone = Signal::sine(1000.0, 0.5, 8000, 8000).unwrap();
        let inside = BandMeasurement::of(&tone, &FrequencyBand::new(900.0, 1100.0));
        assert!(inside.band_share_db().abs() < 1e-6);

        let outside = BandMeasurement::of(&tone, &FrequencyBand::new(2000.0, 3000.0));
        assert!(outside.band_share_db() < -100.0);
    }

    #[test]
    fn test_reference_rate_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.wav");
        WavResult::from_signal(&Signal::silence(100, 16000).unwrap())
            .write_to(&path)
            .unwrap();

        let input = Signal::silence(100, 8000).unwrap();
        let err = load_reference(path.to_str().unwrap(), &input).unwrap_err();
        assert!(err.to_string().contains("16000 Hz"));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let band = FrequencyBand::new(100.0, 200.0);
        assert!(run_human("/nonexistent/in.wav", &band, None).is_err());
    }
}
