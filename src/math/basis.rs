//! Basis functions for the decomposition model.
//!
//! - Fourier terms for a period `P` and order `N`:
//!   `sin(2π·i·d/P), cos(2π·i·d/P)` for `i = 1..=N`, where `d` is measured in days.
//! - Hinge terms for piecewise linear trends: `max(0, t - s)`.

use std::f64::consts::PI;

/// Write the `2 * order` Fourier terms for time `d` (days) into `out`.
///
/// Layout is `[sin_1, cos_1, sin_2, cos_2, ...]`.
///
/// # Panics
/// Panics if `out.len() < 2 * order`.
pub fn fill_fourier(d: f64, period: f64, order: usize, out: &mut [f64]) {
    for i in 0..order {
        let x = 2.0 * PI * (i + 1) as f64 * d / period;
        out[2 * i] = x.sin();
        out[2 * i + 1] = x.cos();
    }
}

/// Piecewise linear hinge anchored at changepoint `s`.
#[inline]
pub fn hinge(t: f64, s: f64) -> f64 {
    (t - s).max(0.0)
}
