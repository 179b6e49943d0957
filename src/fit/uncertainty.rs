//! Future predictions with simulated confidence intervals.
//!
//! Each simulated future:
//! - draws a Poisson number of new trend changepoints beyond the history, at
//!   the same rate as the fitted changepoints (`S` per unit of scaled time)
//! - gives each one a Laplace magnitude with scale `mean |δ|`
//! - adds Gaussian observation noise with the fitted residual scale
//!
//! New changepoints are only ever summed as `Σδ` and `Σδ·s` per horizon
//! segment, so a sample costs O(horizon) however far the horizon reaches in
//! scaled time.
//!
//! The interval is the central `interval_width` share of the simulated values,
//! widened when needed so it always contains the point forecast. The RNG is
//! seeded from the model spec, so the same request always yields the same bounds.

use chrono::NaiveDateTime;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Poisson, StandardNormal};

use crate::error::AppError;
use crate::math::quantile_sorted;
use crate::models::FittedModel;

/// Above this many new changepoints in one segment the aggregate shock is
/// drawn from its normal limit instead of one changepoint at a time.
const EXACT_SHOCK_LIMIT: usize = 256;

/// Point forecasts and interval bounds, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub timestamps: Vec<NaiveDateTime>,
    pub yhat: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Predict `future` timestamps and attach confidence bounds.
pub fn forecast(model: &FittedModel, future: &[NaiveDateTime]) -> Result<Forecast, AppError> {
    let yhat = model.predict_many(future);
    if yhat.iter().any(|v| !v.is_finite()) {
        return Err(AppError::internal("Non-finite model prediction for future timestamps."));
    }

    let (lower, upper) = simulate_intervals(model, future, &yhat)?;

    Ok(Forecast {
        timestamps: future.to_vec(),
        yhat,
        lower,
        upper,
    })
}

fn simulate_intervals(
    model: &FittedModel,
    future: &[NaiveDateTime],
    yhat: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), AppError> {
    let n_samples = model.spec.uncertainty_samples;
    if n_samples == 0 || future.is_empty() {
        return Ok((yhat.to_vec(), yhat.to_vec()));
    }

    let t: Vec<f64> = future.iter().map(|&ts| model.scaled_time(ts)).collect();
    let trend: Vec<f64> = t.iter().map(|&th| model.trend(th)).collect();
    let seasonal: Vec<f64> = future.iter().map(|&ts| model.seasonal(ts)).collect();

    // Horizon steps in time order; each owns the slice of new-changepoint time
    // between the previous step (or the end of history) and itself.
    let mut order: Vec<usize> = (0..t.len()).collect();
    order.sort_by(|&a, &b| t[a].total_cmp(&t[b]));
    let mut segments = Vec::with_capacity(order.len());
    let mut prev = 1.0_f64;
    for &h in &order {
        let end = t[h].max(prev);
        segments.push((prev, end));
        prev = end;
    }

    let rate = model.changepoints.len() as f64;
    let shock_scale = model.mean_abs_delta() + 1e-8;

    let mut rng = StdRng::seed_from_u64(model.spec.seed);
    let mut samples: Vec<Vec<f64>> = vec![Vec::with_capacity(n_samples); future.len()];

    for _ in 0..n_samples {
        // Running Σδ and Σδ·s over all new changepoints before the current step,
        // so the shock at t is t·Σδ - Σδ·s.
        let mut sum_delta = 0.0;
        let mut sum_delta_s = 0.0;
        for (&h, &(from, to)) in order.iter().zip(&segments) {
            let (d, ds) = sample_segment_shocks(&mut rng, rate * (to - from), from, to, shock_scale)?;
            sum_delta += d;
            sum_delta_s += ds;

            let shock = t[h] * sum_delta - sum_delta_s;
            let noise: f64 = rng.sample::<f64, _>(StandardNormal) * model.sigma_obs;
            samples[h].push((trend[h] + shock + seasonal[h] + noise) * model.y_scale);
        }
    }

    let alpha = (1.0 - model.spec.interval_width) / 2.0;
    let mut lower = Vec::with_capacity(future.len());
    let mut upper = Vec::with_capacity(future.len());
    for (h, mut values) in samples.into_iter().enumerate() {
        values.sort_by(f64::total_cmp);
        let lo = quantile_sorted(&values, alpha);
        let hi = quantile_sorted(&values, 1.0 - alpha);
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(AppError::internal("Non-finite confidence bound."));
        }
        lower.push(lo.min(yhat[h]));
        upper.push(hi.max(yhat[h]));
    }

    Ok((lower, upper))
}

/// `(Σδ, Σδ·s)` for a Poisson(`expected`) number of changepoints placed
/// uniformly in `[from, to)` with Laplace(`scale`) magnitudes.
///
/// Up to [`EXACT_SHOCK_LIMIT`] changepoints are drawn one by one; beyond that
/// the pair is drawn from its normal limit (same mean and covariance).
fn sample_segment_shocks(
    rng: &mut StdRng,
    expected: f64,
    from: f64,
    to: f64,
    scale: f64,
) -> Result<(f64, f64), AppError> {
    if expected <= 0.0 || to <= from {
        return Ok((0.0, 0.0));
    }
    let count: f64 = Poisson::new(expected)
        .map_err(|e| AppError::internal(format!("Changepoint distribution error: {e}")))?
        .sample(rng);

    if count <= EXACT_SHOCK_LIMIT as f64 {
        let mut sum_delta = 0.0;
        let mut sum_delta_s = 0.0;
        for _ in 0..count as usize {
            let s = rng.gen_range(from..to);
            let delta = sample_laplace(rng, scale);
            sum_delta += delta;
            sum_delta_s += delta * s;
        }
        return Ok((sum_delta, sum_delta_s));
    }

    // Var(δ) = 2b² for Laplace(b); s ~ U[from, to).
    let variance = 2.0 * scale * scale * count;
    let mid = 0.5 * (from + to);
    let width = to - from;
    let z1: f64 = rng.sample(StandardNormal);
    let z2: f64 = rng.sample(StandardNormal);
    let sum_delta = variance.sqrt() * z1;
    let sum_delta_s = mid * sum_delta + (variance * width * width / 12.0).sqrt() * z2;
    Ok((sum_delta, sum_delta_s))
}

/// Laplace(0, scale) by inverse CDF.
fn sample_laplace(rng: &mut StdRng, scale: f64) -> f64 {
    let u: f64 = rng.gen_range(-0.5..0.5);
    let tail = (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE);
    -scale * u.signum() * tail.ln()
}
