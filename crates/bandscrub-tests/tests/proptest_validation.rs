//! Property-based validation and design tests using proptest.
//!
//! Validation must never panic on arbitrary input, and every config that
//! validates must design and run.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bandscrub-tests --test proptest_validation
//! ```

use proptest::prelude::*;

use bandscrub_dsp::kaiser::kaiser_order;
use bandscrub_dsp::{FilterMode, FilterSpec, FrequencyBand, KaiserFirDesigner};
use bandscrub_spec::{ErrorCode, RunConfig};

// ============================================================================
// 1. Validation never panics
// ============================================================================

fn any_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        Just(0.0),
        Just(-1.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        -100_000.0..100_000.0f64,
    ]
}

proptest! {
    /// Arbitrary numeric configs produce a result, never a panic.
    #[test]
    fn run_config_validation_never_panics(
        sample_rate in any::<u32>(),
        duration in any_float(),
        cutoff_1 in any_float(),
        cutoff_2 in any_float(),
        ripple in any_float(),
        noise_min in any_float(),
        noise_max in any_float(),
        amplitude in any_float(),
        tone in any_float(),
        response_points in 0usize..10,
    ) {
        let config = RunConfig {
            sample_rate,
            duration_seconds: duration,
            cutoff_hz_1: cutoff_1,
            cutoff_hz_2: cutoff_2,
            ripple_db: ripple,
            noise_min_hz: noise_min,
            noise_max_hz: noise_max,
            noise_amplitude: amplitude,
            tone_hz: tone,
            response_points,
            ..RunConfig::default()
        };
        let _ = config.validate();
    }

    /// Arbitrary strings never panic the JSON loader.
    #[test]
    fn config_json_never_panics(s in "\\PC{0,200}") {
        let _ = RunConfig::from_json(&s);
    }

    /// Inverted or empty bands are always rejected.
    #[test]
    fn inverted_bands_fail(
        low in 0.0..20_000.0f64,
        gap in 0.0..1_000.0f64,
        sample_rate in 8_000u32..96_000,
    ) {
        let band = FrequencyBand::new(low + gap, low);
        let err = band.validate(sample_rate).unwrap_err();
        prop_assert_eq!(err.code, ErrorCode::InvalidFrequencyBand);
    }
}

// ============================================================================
// 2. Valid configs design and run
// ============================================================================

/// Filter specs that satisfy every validation rule.
fn valid_filter_spec() -> impl Strategy<Value = FilterSpec> {
    (
        8_000u32..=48_000,
        0.05..0.4f64,
        0.05..0.3f64,
        20.0..80.0f64,
        prop_oneof![Just(FilterMode::Stopband), Just(FilterMode::Passband)],
    )
        .prop_map(|(sample_rate, low_frac, width_frac, ripple, mode)| {
            let nyquist = sample_rate as f64 / 2.0;
            let low = low_frac * nyquist;
            let high = low + width_frac * nyquist;
            FilterSpec::new(sample_rate, low, high, ripple).with_mode(mode)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Valid specs design odd-length taps of the Kaiser-estimated length.
    #[test]
    fn valid_specs_design_odd_taps(spec in valid_filter_spec()) {
        prop_assert!(spec.validate().is_ok());
        let taps = KaiserFirDesigner::design(&spec).unwrap();

        prop_assert_eq!(taps.len() % 2, 1);
        let (expected, beta) = kaiser_order(spec.ripple_db, spec.transition_width()).unwrap();
        prop_assert_eq!(taps.len(), expected);
        prop_assert!((taps.beta() - beta).abs() < 1e-12);
    }

    /// Taps are symmetric (linear phase).
    #[test]
    fn taps_are_symmetric(spec in valid_filter_spec()) {
        let taps = KaiserFirDesigner::design(&spec).unwrap();
        let h = taps.coefficients();
        for i in 0..h.len() / 2 {
            prop_assert!((h[i] - h[h.len() - 1 - i]).abs() < 1e-12);
        }
    }

    /// Stopband designs have unity gain at DC.
    #[test]
    fn stopband_dc_gain_is_unity(spec in valid_filter_spec()) {
        let spec = spec.with_mode(FilterMode::Stopband);
        let taps = KaiserFirDesigner::design(&spec).unwrap();
        let dc: f64 = taps.coefficients().iter().sum();
        prop_assert!((dc - 1.0).abs() < 1e-9, "dc gain {}", dc);
    }

    /// A config built around a valid filter validates.
    #[test]
    fn valid_configs_pass(spec in valid_filter_spec(), amplitude in 0.0..1_000.0f64) {
        let center = spec.band().center();
        let quarter = spec.band().width() / 4.0;
        let config = RunConfig {
            sample_rate: spec.sample_rate,
            cutoff_hz_1: spec.edge_low_hz,
            cutoff_hz_2: spec.edge_high_hz,
            ripple_db: spec.ripple_db,
            filter_mode: spec.mode,
            noise_min_hz: center - quarter,
            noise_max_hz: center + quarter,
            noise_amplitude: amplitude,
            tone_hz: spec.nyquist() / 10.0,
            ..RunConfig::default()
        };
        let result = config.validate();
        prop_assert!(result.is_ok(), "{:?}", result.errors);
        prop_assert!(result.warnings.is_empty());
    }
}
