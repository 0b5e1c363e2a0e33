//! CLI commands against a scratch output directory.

use std::fs;
use std::process::ExitCode;

use bandscrub_cli::commands;
use bandscrub_cli::commands::config_args::ConfigArgs;
use bandscrub_dsp::wav::{read_wav, WavResult};
use bandscrub_dsp::{FrequencyBand, Signal};
use bandscrub_tests::audio_analysis::band_attenuation_db;
use bandscrub_tests::fixtures::OutputDirFixture;

const PREFIX: &str = "noise_1150_1250_1000_1400_40";

#[test]
fn run_writes_all_outputs() {
    let fixture = OutputDirFixture::new();
    let code = commands::run::run(&fixture.quick_args(42), None, Some(false), false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    for suffix in ["output.wav", "with_noise.wav", "filtered.wav", "response.json"] {
        let path = fixture.file(&format!("{}_{}", PREFIX, suffix));
        assert!(path.exists(), "missing {}", path.display());
    }

    let clean = read_wav(&fixture.file(&format!("{}_output.wav", PREFIX))).unwrap();
    let noisy = read_wav(&fixture.file(&format!("{}_with_noise.wav", PREFIX))).unwrap();
    let filtered = read_wav(&fixture.file(&format!("{}_filtered.wav", PREFIX))).unwrap();
    assert_eq!(clean.sample_rate(), 8000);
    assert_eq!(clean.len(), 4000);
    assert_eq!(noisy.len(), 4000);
    assert_eq!(filtered.len(), 4000);

    // Measured from the files, past the 46-sample transient.
    let band = FrequencyBand::new(1150.0, 1250.0);
    let attenuation = band_attenuation_db(
        &noisy.samples()[46..],
        &filtered.samples()[46..],
        8000,
        &band,
    );
    assert!(attenuation > 15.0, "attenuation {} dB", attenuation);
}

#[test]
fn run_json_mode_succeeds() {
    let fixture = OutputDirFixture::new();
    let code = commands::run::run(&fixture.quick_args(7), None, Some(false), true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(fixture
        .file(&format!("{}_response.json", PREFIX))
        .exists());
}

#[test]
fn run_uses_input_file_rate() {
    let fixture = OutputDirFixture::new();
    let input_path = fixture.file("speech.wav");
    let input = Signal::sine(300.0, 0.5, 2000, 8000).unwrap();
    WavResult::from_signal(&input).write_to(&input_path).unwrap();

    // The configured 44.1 kHz rate is replaced by the file's 8 kHz.
    let args = ConfigArgs {
        sample_rate: Some(44100),
        ..fixture.quick_args(1)
    };
    let input_arg = input_path.display().to_string();
    let code = commands::run::run(&args, Some(&input_arg), Some(false), false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let filtered = read_wav(&fixture.file(&format!("{}_filtered.wav", PREFIX))).unwrap();
    assert_eq!(filtered.sample_rate(), 8000);
    assert_eq!(filtered.len(), 2000);
}

#[test]
fn run_rejects_invalid_config() {
    let fixture = OutputDirFixture::new();
    let args = ConfigArgs {
        cutoff_low: Some(1500.0),
        ..fixture.quick_args(1)
    };
    for json in [false, true] {
        let code = commands::run::run(&args, None, Some(false), json).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }
    assert_eq!(fs::read_dir(fixture.path()).unwrap().count(), 0);
}

#[test]
fn run_reports_missing_input() {
    let fixture = OutputDirFixture::new();
    let args = fixture.quick_args(1);
    assert!(commands::run::run(&args, Some("/nonexistent/in.wav"), Some(false), false).is_err());

    let code = commands::run::run(&args, Some("/nonexistent/in.wav"), Some(false), true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn design_writes_taps_and_response() {
    let fixture = OutputDirFixture::new();
    let taps = fixture.file("taps.json");
    let response = fixture.file("response.json");
    let taps_arg = taps.display().to_string();
    let response_arg = response.display().to_string();

    let code = commands::design::run(
        &fixture.quick_args(1),
        Some(&taps_arg),
        Some(&response_arg),
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&taps).unwrap()).unwrap();
    assert_eq!(doc["coefficients"].as_array().unwrap().len(), 47);
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&response).unwrap()).unwrap();
    assert_eq!(doc["points"].as_array().unwrap().len(), 257);
}

#[test]
fn noise_then_analyze() {
    let fixture = OutputDirFixture::new();
    let code = commands::noise::run(&fixture.quick_args(5), None, false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let path = fixture.file("noise_1150_1250.wav");
    assert!(path.exists());
    let noise = read_wav(&path).unwrap();
    assert_eq!(noise.len(), 4000);

    let path_arg = path.display().to_string();
    let band = FrequencyBand::new(1150.0, 1250.0);
    for json in [false, true] {
        let code = commands::analyze::run(&path_arg, &band, None, json).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}

#[test]
fn analyze_compares_against_reference() {
    let fixture = OutputDirFixture::new();
    commands::run::run(&fixture.quick_args(3), None, Some(false), false).unwrap();

    let noisy = fixture.file(&format!("{}_with_noise.wav", PREFIX)).display().to_string();
    let filtered = fixture.file(&format!("{}_filtered.wav", PREFIX)).display().to_string();
    let band = FrequencyBand::new(1150.0, 1250.0);
    let code = commands::analyze::run(&filtered, &band, Some(&noisy), true).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    // A band above the file's Nyquist is rejected.
    let too_high = FrequencyBand::new(3000.0, 5000.0);
    let code = commands::analyze::run(&filtered, &too_high, None, true).unwrap();
    assert_eq!(code, ExitCode::from(1));
}
