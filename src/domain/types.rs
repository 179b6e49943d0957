//! Shared domain types.
//!
//! The request/response types mirror the JSON schema of the forecast service
//! field for field, so they double as the wire format and as the CLI's file
//! format.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fewest distinct observations the pipeline accepts.
pub const MIN_POINTS: usize = 30;

/// Forecast horizon used when the caller does not ask for one.
pub const DEFAULT_HORIZON: usize = 5;

/// Hard cap on the forecast horizon.
pub const MAX_HORIZON: usize = 5;

/// One caller-supplied OHLCV observation. Only `close` is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub historical_data: Vec<HistoricalPoint>,
    #[serde(default)]
    pub forecast_days: Option<i64>,
}

impl ForecastRequest {
    /// Number of future steps to produce.
    ///
    /// Missing or zero falls back to [`DEFAULT_HORIZON`]; anything larger than
    /// [`MAX_HORIZON`] is clamped.
    pub fn horizon(&self) -> Result<usize, AppError> {
        match self.forecast_days {
            None | Some(0) => Ok(DEFAULT_HORIZON),
            Some(days) if days < 0 => Err(AppError::validation(format!(
                "forecast_days must be positive, got {days}"
            ))),
            Some(days) => Ok(usize::try_from(days).map_or(MAX_HORIZON, |d| d.min(MAX_HORIZON))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBound {
    pub lower: f64,
    pub upper: f64,
}

/// Accuracy of the model on the chronological validation prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mae: f64,
    /// Mean absolute percentage error, in percent.
    pub mape: f64,
    pub validation_period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub historical_dates: Vec<String>,
    pub historical_prices: Vec<f64>,
    pub forecast_dates: Vec<String>,
    pub forecast_prices: Vec<f64>,
    pub confidence_intervals: Vec<ConfidenceBound>,
    pub metrics: ValidationMetrics,
}

/// A normalized observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub ds: NaiveDateTime,
    pub y: f64,
}

/// Deduplicated, ascending series of observations.
///
/// Only [`crate::io::ingest::normalize`] builds one from caller data, which is
/// what guarantees strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    /// Wrap points that are already sorted and unique.
    pub(crate) fn from_sorted(points: Vec<SeriesPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].ds < w[1].ds));
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.ds).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// The first `len` observations (clamped to the series length).
    pub fn prefix(&self, len: usize) -> Series {
        Series {
            points: self.points[..len.min(self.points.len())].to_vec(),
        }
    }
}

/// Tunables of the decomposition forecaster and the request pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecasterConfig {
    /// Trend flexibility; larger values let the slope change more readily.
    pub changepoint_prior_scale: f64,
    /// Number of potential trend changepoints.
    pub n_changepoints: usize,
    /// Share of history (from the start) in which changepoints are placed.
    pub changepoint_range: f64,
    /// Default prior scale for seasonal components.
    pub seasonality_prior_scale: f64,
    /// Coverage of the reported confidence interval.
    pub interval_width: f64,
    /// Number of simulated futures used for the interval.
    pub uncertainty_samples: usize,
    /// Seed for the uncertainty simulation.
    pub seed: u64,
    /// Share of history (from the start) used for the validation refit.
    pub validation_fraction: f64,
    pub min_points: usize,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            changepoint_prior_scale: 0.5,
            n_changepoints: 25,
            changepoint_range: 0.8,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 0,
            validation_fraction: 0.8,
            min_points: MIN_POINTS,
        }
    }
}

impl ForecasterConfig {
    /// Defaults, with the seed taken from `FORECAST_SEED` when set.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("FORECAST_SEED") {
            config.seed = raw
                .trim()
                .parse()
                .map_err(|_| AppError::input(format!("FORECAST_SEED must be an unsigned integer, got '{raw}'")))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(days: Option<i64>) -> ForecastRequest {
        ForecastRequest {
            historical_data: Vec::new(),
            forecast_days: days,
        }
    }

    #[test]
    fn horizon_defaults_and_clamps() {
        assert_eq!(request(None).horizon().unwrap(), 5);
        assert_eq!(request(Some(0)).horizon().unwrap(), 5);
        assert_eq!(request(Some(3)).horizon().unwrap(), 3);
        assert_eq!(request(Some(20)).horizon().unwrap(), 5);
        assert!(request(Some(-2)).horizon().is_err());
    }

    #[test]
    fn request_without_forecast_days_deserializes() {
        let req: ForecastRequest = serde_json::from_str(r#"{"historical_data": []}"#).unwrap();
        assert_eq!(req.forecast_days, None);
    }
}
