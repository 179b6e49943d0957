//! Additive trend + seasonality model.
//!
//! ```text
//! y(t) = m + k·t + Σ_j δ_j·max(0, t - s_j) + Σ_s Fourier_s(d)
//! ```
//!
//! - `t` is time scaled to `[0, 1]` over the fitted history
//! - `d` is days since the Unix epoch (so seasonal phases are calendar-aligned)
//! - `y` is scaled by `max |y|` during fitting and unscaled on prediction
//!
//! The design-row layout is `[1, t, hinge_1..hinge_S, fourier...]`; the fitter
//! and the predictor share [`fill_design_row`] so they cannot drift apart.

use chrono::NaiveDateTime;

use crate::domain::ForecasterConfig;
use crate::math::{fill_fourier, hinge};
use crate::models::seasonality::{Seasonality, default_seasonalities};

/// A configured, not yet fitted, forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub changepoint_prior_scale: f64,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub seasonality_prior_scale: f64,
    pub interval_width: f64,
    pub uncertainty_samples: usize,
    pub seed: u64,
    /// Explicitly added components (defaults are resolved at fit time).
    pub seasonalities: Vec<Seasonality>,
}

impl ModelSpec {
    pub fn new(config: &ForecasterConfig) -> Self {
        Self {
            changepoint_prior_scale: config.changepoint_prior_scale,
            n_changepoints: config.n_changepoints,
            changepoint_range: config.changepoint_range,
            seasonality_prior_scale: config.seasonality_prior_scale,
            interval_width: config.interval_width,
            uncertainty_samples: config.uncertainty_samples,
            seed: config.seed,
            seasonalities: Vec::new(),
        }
    }

    /// Add (or replace, by name) a seasonal component using the default prior scale.
    pub fn add_seasonality(&mut self, name: &str, period: f64, fourier_order: usize) -> &mut Self {
        let component = Seasonality::new(name, period, fourier_order, self.seasonality_prior_scale);
        match self.seasonalities.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = component,
            None => self.seasonalities.push(component),
        }
        self
    }

    pub fn seasonality(&self, name: &str) -> Option<&Seasonality> {
        self.seasonalities.iter().find(|s| s.name == name)
    }

    /// Explicit components plus any defaults they do not shadow.
    pub fn resolve_seasonalities(&self, ds: &[NaiveDateTime]) -> Vec<Seasonality> {
        let mut out = self.seasonalities.clone();
        for default in default_seasonalities(ds, self.seasonality_prior_scale) {
            if self.seasonality(&default.name).is_none() {
                out.push(default);
            }
        }
        out
    }
}

/// A fitted model, ready to predict.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub spec: ModelSpec,
    /// First timestamp of the fitted history (`t = 0`).
    pub start: NaiveDateTime,
    /// Length of the fitted history in (fractional) seconds (`t = 1`).
    pub span_secs: f64,
    pub y_scale: f64,
    /// Changepoint locations in scaled time.
    pub changepoints: Vec<f64>,
    pub seasonalities: Vec<Seasonality>,
    pub intercept: f64,
    pub slope: f64,
    pub deltas: Vec<f64>,
    pub seasonal_betas: Vec<f64>,
    /// Residual standard deviation, in scaled units.
    pub sigma_obs: f64,
}

impl FittedModel {
    pub fn scaled_time(&self, ts: NaiveDateTime) -> f64 {
        elapsed_seconds(self.start, ts) / self.span_secs
    }

    /// Trend component at scaled time `t`, in scaled units.
    pub fn trend(&self, t: f64) -> f64 {
        let bends: f64 = self
            .changepoints
            .iter()
            .zip(&self.deltas)
            .map(|(&s, &delta)| delta * hinge(t, s))
            .sum();
        self.intercept + self.slope * t + bends
    }

    /// Sum of seasonal components at `ts`, in scaled units.
    pub fn seasonal(&self, ts: NaiveDateTime) -> f64 {
        let d = days_since_epoch(ts);
        let mut buf = vec![0.0; seasonal_width(&self.seasonalities)];
        fill_seasonal(d, &self.seasonalities, &mut buf);
        buf.iter().zip(&self.seasonal_betas).map(|(x, b)| x * b).sum()
    }

    /// Point prediction at `ts`, in price units.
    pub fn predict(&self, ts: NaiveDateTime) -> f64 {
        (self.trend(self.scaled_time(ts)) + self.seasonal(ts)) * self.y_scale
    }

    pub fn predict_many(&self, ts: &[NaiveDateTime]) -> Vec<f64> {
        ts.iter().map(|&t| self.predict(t)).collect()
    }

    /// Mean absolute changepoint magnitude (scale of future trend shocks).
    pub fn mean_abs_delta(&self) -> f64 {
        if self.deltas.is_empty() {
            return 0.0;
        }
        self.deltas.iter().map(|d| d.abs()).sum::<f64>() / self.deltas.len() as f64
    }
}

/// Seconds from `from` to `to`, keeping sub-second precision.
pub fn elapsed_seconds(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

pub fn days_since_epoch(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_micros() as f64 / 86_400e6
}

pub fn seasonal_width(seasonalities: &[Seasonality]) -> usize {
    seasonalities.iter().map(Seasonality::width).sum()
}

/// Total number of design-matrix columns.
pub fn column_count(n_changepoints: usize, seasonalities: &[Seasonality]) -> usize {
    2 + n_changepoints + seasonal_width(seasonalities)
}

/// Fill one design row.
///
/// # Panics
/// Panics if `out.len() != column_count(changepoints.len(), seasonalities)`.
pub fn fill_design_row(
    t: f64,
    d: f64,
    changepoints: &[f64],
    seasonalities: &[Seasonality],
    out: &mut [f64],
) {
    assert_eq!(out.len(), column_count(changepoints.len(), seasonalities));

    out[0] = 1.0;
    out[1] = t;
    for (j, &s) in changepoints.iter().enumerate() {
        out[2 + j] = hinge(t, s);
    }
    fill_seasonal(d, seasonalities, &mut out[2 + changepoints.len()..]);
}

fn fill_seasonal(d: f64, seasonalities: &[Seasonality], out: &mut [f64]) {
    let mut offset = 0;
    for s in seasonalities {
        fill_fourier(d, s.period, s.fourier_order, &mut out[offset..offset + s.width()]);
        offset += s.width();
    }
}
