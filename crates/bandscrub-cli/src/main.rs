//! bandscrub CLI - inject band-limited noise and remove it with a Kaiser FIR
//!
//! This binary runs the full noise injection pipeline and exposes its stages
//! (filter design, noise synthesis, band analysis) as separate commands.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use bandscrub_cli::commands;
use bandscrub_cli::commands::config_args::ConfigArgs;
use bandscrub_dsp::FrequencyBand;

/// bandscrub - band-limited noise injection and FIR notch filtering
#[derive(Parser)]
#[command(name = "bandscrub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add band-limited noise to a signal, filter it, and write the results
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// WAV file to use as the clean signal (default: synthetic tone)
        #[arg(short, long)]
        input: Option<String>,

        /// Open the noisy and filtered files with the default player
        #[arg(long, conflicts_with = "no_play")]
        play: bool,

        /// Do not open the output files
        #[arg(long)]
        no_play: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Design the filter and report its length, shape and delay
    Design {
        #[command(flatten)]
        config: ConfigArgs,

        /// Write the taps as JSON to this path
        #[arg(long)]
        taps_out: Option<String>,

        /// Write the frequency response as JSON to this path
        #[arg(long)]
        response_out: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Synthesize band-limited noise into a WAV file
    Noise {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output WAV path (default: <output-dir>/noise_<min>_<max>.wav)
        #[arg(long)]
        output: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Measure the energy of a WAV file inside a frequency band
    Analyze {
        /// WAV file to analyze
        #[arg(short, long)]
        input: String,

        /// Lower band edge in Hz
        #[arg(long, default_value_t = 1950.0)]
        min_hz: f64,

        /// Upper band edge in Hz
        #[arg(long, default_value_t = 2050.0)]
        max_hz: f64,

        /// WAV file to report the band attenuation against
        #[arg(short, long)]
        reference: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Collapses a `--play`/`--no-play` pair into an override.
fn play_override(play: bool, no_play: bool) -> Option<bool> {
    match (play, no_play) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            input,
            play,
            no_play,
            json,
        } => commands::run::run(
            &config,
            input.as_deref(),
            play_override(play, no_play),
            json,
        ),
        Commands::Design {
            config,
            taps_out,
            response_out,
            json,
        } => commands::design::run(
            &config,
            taps_out.as_deref(),
            response_out.as_deref(),
            json,
        ),
        Commands::Noise {
            config,
            output,
            json,
        } => commands::noise::run(&config, output.as_deref(), json),
        Commands::Analyze {
            input,
            min_hz,
            max_hz,
            reference,
            json,
        } => commands::analyze::run(
            &input,
            &FrequencyBand::new(min_hz, max_hz),
            reference.as_deref(),
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscrub_spec::{FilterMode, WindowKind};

    #[test]
    fn test_cli_parses_run_defaults() {
        let cli = Cli::try_parse_from(["bandscrub", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                config,
                input,
                play,
                no_play,
                json,
            } => {
                assert_eq!(config, ConfigArgs::default());
                assert!(input.is_none());
                assert_eq!(play_override(play, no_play), None);
                assert!(!json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_parses_run_overrides() {
        let cli = Cli::try_parse_from([
            "bandscrub",
            "run",
            "--config",
            "run.json",
            "--input",
            "speech.wav",
            "--cutoff-low",
            "900",
            "--cutoff-high",
            "1100",
            "--ripple-db",
            "50",
            "--mode",
            "passband",
            "-w",
            "kaiser",
            "--noise-min",
            "950",
            "--noise-max",
            "1050",
            "--seed",
            "42",
            "-o",
            "renders",
            "--no-play",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                config,
                input,
                play,
                no_play,
                json,
            } => {
                assert_eq!(config.config.as_deref(), Some("run.json"));
                assert_eq!(input.as_deref(), Some("speech.wav"));
                assert_eq!(config.cutoff_low, Some(900.0));
                assert_eq!(config.cutoff_high, Some(1100.0));
                assert_eq!(config.ripple_db, Some(50.0));
                assert_eq!(config.mode, Some(FilterMode::Passband));
                assert_eq!(config.window, Some(WindowKind::Kaiser));
                assert_eq!(config.noise_min, Some(950.0));
                assert_eq!(config.noise_max, Some(1050.0));
                assert_eq!(config.seed, Some(42));
                assert_eq!(config.output_dir.as_deref(), Some("renders"));
                assert_eq!(play_override(play, no_play), Some(false));
                assert!(json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["bandscrub", "run", "--mode", "lowpass"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_window() {
        assert!(Cli::try_parse_from(["bandscrub", "design", "--window", "hann"]).is_err());
    }

    #[test]
    fn test_cli_rejects_play_and_no_play() {
        assert!(Cli::try_parse_from(["bandscrub", "run", "--play", "--no-play"]).is_err());
    }

    #[test]
    fn test_cli_parses_design() {
        let cli = Cli::try_parse_from([
            "bandscrub",
            "design",
            "--sample-rate",
            "8000",
            "--taps-out",
            "taps.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Design {
                config,
                taps_out,
                response_out,
                json,
            } => {
                assert_eq!(config.sample_rate, Some(8000));
                assert_eq!(taps_out.as_deref(), Some("taps.json"));
                assert!(response_out.is_none());
                assert!(!json);
            }
            _ => panic!("expected design command"),
        }
    }

    #[test]
    fn test_cli_parses_noise() {
        let cli = Cli::try_parse_from([
            "bandscrub",
            "noise",
            "--duration",
            "2",
            "--noise-amplitude",
            "100",
            "--output",
            "noise.wav",
        ])
        .unwrap();
        match cli.command {
            Commands::Noise {
                config,
                output,
                json,
            } => {
                assert_eq!(config.duration, Some(2.0));
                assert_eq!(config.noise_amplitude, Some(100.0));
                assert_eq!(output.as_deref(), Some("noise.wav"));
                assert!(!json);
            }
            _ => panic!("expected noise command"),
        }
    }

    #[test]
    fn test_cli_parses_analyze_with_default_band() {
        let cli = Cli::try_parse_from([
            "bandscrub",
            "analyze",
            "-i",
            "filtered.wav",
            "-r",
            "noisy.wav",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                input,
                min_hz,
                max_hz,
                reference,
                json,
            } => {
                assert_eq!(input, "filtered.wav");
                assert_eq!(min_hz, 1950.0);
                assert_eq!(max_hz, 2050.0);
                assert_eq!(reference.as_deref(), Some("noisy.wav"));
                assert!(json);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_cli_analyze_requires_input() {
        assert!(Cli::try_parse_from(["bandscrub", "analyze"]).is_err());
    }
}
