//! Kaiser window and the empirical Kaiser design formulas.

use std::f64::consts::PI;

/// Lowest attenuation the order formula is evaluated at.
///
/// Below roughly 8 dB the formula returns a non-positive length.
pub const MIN_ORDER_ATTENUATION_DB: f64 = 8.0;

/// Modified Bessel function of the first kind, order zero.
///
/// Power series `Σ ((x/2)^k / k!)²`, summed until the next term no longer
/// moves the result. Returns `+∞` once the sum overflows (|x| above ~713).
pub fn bessel_i0(x: f64) -> f64 {
    let half_x_sq = (x / 2.0) * (x / 2.0);
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;

    loop {
        term *= half_x_sq / (k * k);
        sum += term;
        if !sum.is_finite() || term < 1e-16 * sum {
            break;
        }
        k += 1.0;
    }

    sum
}

/// Kaiser β for a desired attenuation `a` in dB.
pub fn kaiser_beta(a: f64) -> f64 {
    if a > 50.0 {
        0.1102 * (a - 8.7)
    } else if a > 21.0 {
        0.5842 * (a - 21.0).powf(0.4) + 0.07886 * (a - 21.0)
    } else {
        0.0
    }
}

/// Filter length and β for attenuation `ripple_db` and a transition `width`
/// normalized to Nyquist (1.0 = Nyquist).
///
/// The length is rounded up and forced odd, so the kernel has a centre tap
/// and a whole-sample group delay. Returns `None` if `width` is not a
/// positive finite number or the length would overflow.
pub fn kaiser_order(ripple_db: f64, width: f64) -> Option<(usize, f64)> {
    if !width.is_finite() || width <= 0.0 || !ripple_db.is_finite() {
        return None;
    }

    let a = ripple_db.max(MIN_ORDER_ATTENUATION_DB);
    let estimate = ((a - 7.95) / 2.285 / (PI * width) + 1.0).ceil();
    if !estimate.is_finite() || estimate >= usize::MAX as f64 {
        return None;
    }

    let numtaps = (estimate as usize).max(1) | 1;
    Some((numtaps, kaiser_beta(ripple_db)))
}

/// Kaiser window of length `n`.
///
/// `w[i] = I0(β·sqrt(1 − ((2i − (n−1)) / (n−1))²)) / I0(β)`; a length-one
/// window is `[1.0]`.
pub fn kaiser_window(n: usize, beta: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let i0_beta = bessel_i0(beta);
            let n_minus_1 = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let ratio = (2.0 * i as f64 - n_minus_1) / n_minus_1;
                    let x = beta * (1.0 - ratio * ratio).max(0.0).sqrt();
                    bessel_i0(x) / i0_beta
                })
                .collect()
        }
    }
}
