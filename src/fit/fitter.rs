//! Penalized least squares fit of the decomposition model.
//!
//! Given a configured [`ModelSpec`] and a [`Series`] we:
//! - scale `y` by `max |y|` and time to `[0, 1]`
//! - place trend changepoints at evenly spaced indices in the first
//!   `changepoint_range` share of history
//! - resolve the seasonal components (explicit + defaults)
//! - solve one ridge problem for all coefficients
//!
//! Changepoint deltas are shrunk with `(σ_ref / changepoint_prior_scale)^2` and
//! Fourier coefficients with `(σ_ref / prior_scale)^2`; intercept and slope are
//! left free. A larger prior scale therefore means a weaker penalty.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::Series;
use crate::error::AppError;
use crate::math::solve_penalized;
use crate::models::{FittedModel, ModelSpec, column_count, days_since_epoch, elapsed_seconds, fill_design_row};

/// Reference noise level (in scaled units) that converts prior scales into penalties.
const PENALTY_NOISE_SCALE: f64 = 0.02;

/// Fit `spec` to every observation of `series`.
pub fn fit_model(spec: &ModelSpec, series: &Series) -> Result<FittedModel, AppError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AppError::internal("No data points to fit."));
    };
    if series.len() < 2 {
        return Err(AppError::internal("At least two data points are required to fit a trend."));
    }

    let ds = series.timestamps();
    let y = series.values();
    if y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::internal("Non-finite price in input series."));
    }

    let span_secs = elapsed_seconds(first.ds, last.ds);
    if span_secs <= 0.0 {
        return Err(AppError::internal("History must span a positive duration."));
    }

    let y_scale = match y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())) {
        m if m > 0.0 => m,
        _ => 1.0,
    };

    let t: Vec<f64> = ds
        .iter()
        .map(|&ts| elapsed_seconds(first.ds, ts) / span_secs)
        .collect();

    let changepoints = place_changepoints(&t, spec.n_changepoints, spec.changepoint_range);
    let seasonalities = spec.resolve_seasonalities(&ds);

    let n = ds.len();
    let p = column_count(changepoints.len(), &seasonalities);

    let mut data = vec![0.0; n * p];
    for (i, row) in data.chunks_exact_mut(p).enumerate() {
        fill_design_row(t[i], days_since_epoch(ds[i]), &changepoints, &seasonalities, row);
    }
    let x = DMatrix::from_row_slice(n, p, &data);
    let target = DVector::from_iterator(n, y.iter().map(|v| v / y_scale));

    let mut penalties = vec![0.0, 0.0];
    let delta_penalty = (PENALTY_NOISE_SCALE / spec.changepoint_prior_scale).powi(2);
    penalties.extend(std::iter::repeat_n(delta_penalty, changepoints.len()));
    for s in &seasonalities {
        let lambda = (PENALTY_NOISE_SCALE / s.prior_scale).powi(2);
        penalties.extend(std::iter::repeat_n(lambda, s.width()));
    }

    let beta = solve_penalized(&x, &target, &penalties)
        .ok_or_else(|| AppError::internal("Least squares solve failed: design matrix is ill-conditioned."))?;

    let fitted = &x * &beta;
    let sse: f64 = fitted
        .iter()
        .zip(target.iter())
        .map(|(f, y)| (y - f).powi(2))
        .sum();
    let sigma_obs = (sse / n as f64).sqrt();
    if !sigma_obs.is_finite() {
        return Err(AppError::internal("Non-finite residuals after fit."));
    }

    let n_cp = changepoints.len();
    let model = FittedModel {
        spec: spec.clone(),
        start: first.ds,
        span_secs,
        y_scale,
        seasonalities,
        intercept: beta[0],
        slope: beta[1],
        deltas: beta.rows(2, n_cp).iter().copied().collect(),
        seasonal_betas: beta.rows(2 + n_cp, p - 2 - n_cp).iter().copied().collect(),
        changepoints,
        sigma_obs,
    };

    debug!(
        points = n,
        columns = p,
        changepoints = n_cp,
        seasonalities = ?model.seasonalities.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        sigma_obs = model.sigma_obs * y_scale,
        "fitted decomposition model"
    );

    Ok(model)
}

/// Changepoint locations (scaled time) at evenly spaced history indices.
///
/// Index 0 is never a changepoint; when history is short the count drops to
/// `floor(n * range) - 1`.
fn place_changepoints(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * range).floor() as usize;
    if hist_size < 2 {
        return Vec::new();
    }
    let n_cp = n_changepoints.min(hist_size - 1);
    if n_cp == 0 {
        return Vec::new();
    }

    (1..=n_cp)
        .map(|i| {
            let idx = (i as f64 * (hist_size - 1) as f64 / n_cp as f64).round() as usize;
            t[idx]
        })
        .collect()
}
