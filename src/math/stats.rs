//! Error metrics and sample statistics.

/// Mean absolute error. `NaN` for empty or mismatched inputs.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();

    sum / actual.len() as f64
}

/// Mean absolute percentage error as a fraction (multiply by 100 for percent).
///
/// Each term is divided by `max(|actual|, f64::EPSILON)`, so zero actuals give
/// a very large (but finite) error instead of a division by zero.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs() / a.abs().max(f64::EPSILON))
        .sum();

    sum / actual.len() as f64
}

/// Root mean squared error. `NaN` for empty or mismatched inputs.
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    (sum / actual.len() as f64).sqrt()
}

/// Linear-interpolated quantile of an already sorted sample (`q` in `[0, 1]`).
///
/// Returns `NaN` for an empty sample.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mae_of_known_errors() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.5, 2.0, 2.0, 4.5];
        assert!((mean_absolute_error(&actual, &predicted) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mape_is_a_fraction() {
        let actual = [100.0, 200.0];
        let predicted = [110.0, 180.0];
        assert!((mean_absolute_percentage_error(&actual, &predicted) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn mape_with_zero_actual_stays_finite() {
        let v = mean_absolute_percentage_error(&[0.0], &[1.0]);
        assert!(v.is_finite());
        assert!(v > 1e10);
    }

    #[test]
    fn mismatched_inputs_are_nan() {
        assert!(mean_absolute_error(&[1.0], &[]).is_nan());
        assert!(root_mean_squared_error(&[], &[]).is_nan());
    }

    #[test]
    fn quantiles_interpolate() {
        let sorted = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 0.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert!((quantile_sorted(&sorted, 0.1) - 0.4).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.5) - 2.0).abs() < 1e-12);
    }
}
