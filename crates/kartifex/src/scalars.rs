//! Scalar helpers shared by the solvers and curve code.

use std::f64::consts::TAU;

/// `|a - b| < epsilon`.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Angle equality modulo a full turn.
pub fn angle_eq(t0: f64, t1: f64, epsilon: f64) -> bool {
    let (lo, hi) = if t1 < t0 { (t1, t0) } else { (t0, t1) };
    hi - lo < epsilon || lo - (hi - TAU) < epsilon
}

/// Strict open-interval membership `min < n < max`.
#[inline]
pub fn inside(min: f64, n: f64, max: f64) -> bool {
    min < n && n < max
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `n` sits between `a` and `b`.
#[inline]
pub fn normalize(a: f64, b: f64, n: f64) -> f64 {
    (n - a) / (b - a)
}

#[inline]
pub fn clamp(min: f64, n: f64, max: f64) -> f64 {
    if n <= min {
        min
    } else if n >= max {
        max
    } else {
        n
    }
}

/// Snap `n` to 0 or 1 when it lies within `epsilon` of either.
#[inline]
pub fn round_unit(n: f64, epsilon: f64) -> f64 {
    if approx_eq(n, 0.0, epsilon) {
        0.0
    } else if approx_eq(n, 1.0, epsilon) {
        1.0
    } else {
        n
    }
}

/// Unbiased binary exponent of `d` (as `f64::frexp` would report minus one).
#[inline]
pub(crate) fn exponent(d: f64) -> i32 {
    (((d.to_bits() & 0x7FF0_0000_0000_0000) >> 52) as i32) - 1023
}

/// Power-of-two scale that brings the dominant coefficient's exponent into `[-8, 8]`.
///
/// Returns 1 when all values are zero or already in range. Multiplying by a power
/// of two is exact, so scaled roots equal unscaled ones.
pub fn normalization_factor(values: &[f64]) -> f64 {
    let max = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if max == 0.0 || !max.is_finite() {
        return 1.0;
    }
    let e = exponent(max);
    if !(-8..=8).contains(&e) {
        2.0_f64.powi(-e)
    } else {
        1.0
    }
}
