//! Kaiser windowed-sinc FIR design.
//!
//! A [`FilterSpec`] names two band edges, a ripple tolerance and a pass
//! policy. The edge gap is the transition width; together with the ripple it
//! fixes the filter length and the window shape through the Kaiser formulas.
//! The ideal response is built as a sum of band-limited sinc pairs, windowed,
//! then normalized so the gain is exactly one at a reference frequency.

use std::f64::consts::PI;

use bandscrub_spec::{ErrorCode, FilterMode, FilterSpec, ValidationError};
use serde::Serialize;

use crate::error::{DspError, DspResult};
use crate::kaiser::{kaiser_order, kaiser_window};

/// Longest filter the designer will build.
pub const MAX_TAPS: usize = 1 << 22;

/// FIR coefficients with the metadata needed to apply them correctly.
///
/// Immutable once built; reusable across any number of signals at
/// `sample_rate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterTaps {
    coefficients: Vec<f64>,
    sample_rate: u32,
    beta: f64,
}

impl FilterTaps {
    /// Wraps raw coefficients designed for `sample_rate`.
    ///
    /// β is recorded as 0 since no window is known.
    pub fn from_coefficients(coefficients: Vec<f64>, sample_rate: u32) -> DspResult<Self> {
        if coefficients.is_empty() {
            return Err(DspError::EmptyTaps);
        }
        if sample_rate == 0 {
            return Err(DspError::invalid_param(
                "sample_rate",
                "sample rate must be positive",
            ));
        }
        Ok(Self {
            coefficients,
            sample_rate,
            beta: 0.0,
        })
    }

    /// The coefficients `h[0..N]`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of taps N.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Always false for taps built through this crate.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Sample rate the taps were designed for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Kaiser β of the window.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Group delay `(N − 1) / 2` in samples.
    pub fn group_delay_samples(&self) -> f64 {
        self.len().saturating_sub(1) as f64 / 2.0
    }

    /// Group delay `(N − 1) / (2 · sample_rate)` in seconds.
    pub fn group_delay_seconds(&self) -> f64 {
        self.group_delay_samples() / self.sample_rate as f64
    }
}

/// Designs Kaiser windowed-sinc band filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct KaiserFirDesigner;

impl KaiserFirDesigner {
    /// Designs taps for `spec`.
    ///
    /// # Errors
    /// `InvalidSpec` if the spec fails validation, `InvalidParameter` if the
    /// transition is so narrow the filter would exceed [`MAX_TAPS`].
    pub fn design(spec: &FilterSpec) -> DspResult<FilterTaps> {
        spec.validate()?;

        let nyquist = spec.nyquist();
        let width = spec.transition_width();
        let (numtaps, beta) = kaiser_order(spec.ripple_db, width).ok_or_else(|| {
            DspError::InvalidSpec(ValidationError::with_path(
                ErrorCode::InvalidFilterEdges,
                format!("transition width {} cannot be realized", width),
                "edge_high_hz",
            ))
        })?;
        if numtaps > MAX_TAPS {
            return Err(DspError::invalid_param(
                "edge_high_hz",
                format!(
                    "transition of {} Hz needs {} taps (limit {})",
                    spec.edge_high_hz - spec.edge_low_hz,
                    numtaps,
                    MAX_TAPS
                ),
            ));
        }

        let c1 = spec.edge_low_hz / nyquist;
        let c2 = spec.edge_high_hz / nyquist;
        let (bands, scale_frequency) = match spec.mode {
            FilterMode::Stopband => (vec![(0.0, c1), (c2, 1.0)], 0.0),
            FilterMode::Passband => (vec![(c1, c2)], 0.5 * (c1 + c2)),
        };

        let coefficients = windowed_sinc(numtaps, beta, &bands, scale_frequency)?;
        Ok(FilterTaps {
            coefficients,
            sample_rate: spec.sample_rate,
            beta,
        })
    }
}

/// Normalized sinc, `sin(πx) / (πx)`.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Windowed sum of ideal band responses, scaled to unit gain at
/// `scale_frequency` (normalized to Nyquist).
fn windowed_sinc(
    numtaps: usize,
    beta: f64,
    bands: &[(f64, f64)],
    scale_frequency: f64,
) -> DspResult<Vec<f64>> {
    let alpha = 0.5 * (numtaps - 1) as f64;
    let window = kaiser_window(numtaps, beta);

    let mut h: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let m = i as f64 - alpha;
            let ideal: f64 = bands
                .iter()
                .map(|&(left, right)| right * sinc(right * m) - left * sinc(left * m))
                .sum();
            ideal * w
        })
        .collect();

    let gain: f64 = h
        .iter()
        .enumerate()
        .map(|(i, &c)| c * (PI * (i as f64 - alpha) * scale_frequency).cos())
        .sum();
    if gain == 0.0 || !gain.is_finite() {
        return Err(DspError::invalid_param(
            "edges",
            "filter has no gain at its reference frequency",
        ));
    }

    for c in &mut h {
        *c /= gain;
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Magnitude of the DTFT of `h` at `f` Hz.
    fn magnitude(h: &[f64], f: f64, sample_rate: u32) -> f64 {
        let w = 2.0 * PI * f / sample_rate as f64;
        let (re, im) = h.iter().enumerate().fold((0.0, 0.0), |(re, im), (i, &c)| {
            (re + c * (w * i as f64).cos(), im - c * (w * i as f64).sin())
        });
        (re * re + im * im).sqrt()
    }

    #[test]
    fn test_default_design() {
        let spec = FilterSpec::new(44100, 1900.0, 2100.0, 60.0);
        let taps = KaiserFirDesigner::design(&spec).unwrap();
        assert_eq!(taps.len(), 801);
        assert_eq!(taps.sample_rate(), 44100);
        assert!((taps.beta() - 5.65326).abs() < 1e-9);
        assert_eq!(taps.group_delay_samples(), 400.0);
        assert!((taps.group_delay_seconds() - 400.0 / 44100.0).abs() < 1e-15);
    }

    #[test]
    fn test_taps_are_symmetric() {
        for mode in [FilterMode::Stopband, FilterMode::Passband] {
            let spec = FilterSpec::new(8000, 1000.0, 1400.0, 40.0).with_mode(mode);
            let taps = KaiserFirDesigner::design(&spec).unwrap();
            let h = taps.coefficients();
            let n = h.len();
            for i in 0..n / 2 {
                assert!((h[i] - h[n - 1 - i]).abs() < 1e-12, "{:?} tap {}", mode, i);
            }
        }
    }

    #[test]
    fn test_unity_gain_at_reference() {
        let spec = FilterSpec::new(8000, 1000.0, 1400.0, 40.0);
        let stop = KaiserFirDesigner::design(&spec).unwrap();
        let dc: f64 = stop.coefficients().iter().sum();
        assert!((dc - 1.0).abs() < 1e-12);

        let pass = KaiserFirDesigner::design(&spec.with_mode(FilterMode::Passband)).unwrap();
        assert!((magnitude(pass.coefficients(), 1200.0, 8000) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_stopband_rejects_band_centre() {
        let spec = FilterSpec::new(44100, 1900.0, 2100.0, 60.0);
        let taps = KaiserFirDesigner::design(&spec).unwrap();
        let centre = magnitude(taps.coefficients(), 2000.0, 44100);
        assert!(centre < 4e-3, "centre gain {}", centre);
        let passed = magnitude(taps.coefficients(), 440.0, 44100);
        assert!((passed - 1.0).abs() < 4e-3, "440 Hz gain {}", passed);
    }

    #[test]
    fn test_low_ripple_still_designs() {
        let spec = FilterSpec::new(8000, 1000.0, 3000.0, 3.0);
        let taps = KaiserFirDesigner::design(&spec).unwrap();
        assert_eq!(taps.len(), 3);
        assert_eq!(taps.beta(), 0.0);
    }

    #[test]
    fn test_invalid_spec() {
        let err = KaiserFirDesigner::design(&FilterSpec::new(44100, 2100.0, 1900.0, 60.0))
            .unwrap_err();
        assert!(matches!(err, DspError::InvalidSpec(_)));

        let err = KaiserFirDesigner::design(&FilterSpec::new(44100, 1900.0, 1900.0, 60.0))
            .unwrap_err();
        assert!(matches!(err, DspError::InvalidSpec(_)));

        let err = KaiserFirDesigner::design(&FilterSpec::new(44100, 1900.0, 2100.0, -1.0))
            .unwrap_err();
        assert!(matches!(err, DspError::InvalidSpec(_)));
    }

    #[test]
    fn test_huge_ripple_is_rejected_not_hung() {
        // β for 7000 dB is far past where I0(β) overflows.
        let err = KaiserFirDesigner::design(&FilterSpec::new(8000, 100.0, 4000.0, 7000.0))
            .unwrap_err();
        match err {
            DspError::InvalidSpec(e) => assert_eq!(e.code, ErrorCode::InvalidRipple),
            other => panic!("expected InvalidSpec, got {:?}", other),
        }

        let taps = KaiserFirDesigner::design(&FilterSpec::new(8000, 100.0, 4000.0, 1000.0))
            .unwrap();
        assert!(taps.coefficients().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_too_narrow_transition() {
        let spec = FilterSpec::new(44100, 2000.0, 2000.000_001, 60.0);
        let err = KaiserFirDesigner::design(&spec).unwrap_err();
        assert_eq!(err.code(), "DSP_006");
    }

    #[test]
    fn test_from_coefficients() {
        let taps = FilterTaps::from_coefficients(vec![0.25, 0.5, 0.25], 1000).unwrap();
        assert_eq!(taps.len(), 3);
        assert_eq!(taps.beta(), 0.0);
        assert_eq!(taps.group_delay_seconds(), 0.001);

        assert!(matches!(
            FilterTaps::from_coefficients(Vec::new(), 1000),
            Err(DspError::EmptyTaps)
        ));
        assert!(FilterTaps::from_coefficients(vec![1.0], 0).is_err());
    }
}
