//! Reporting utilities: response assembly and formatted terminal output.

pub mod format;

pub use format::*;

use chrono::NaiveDateTime;

use crate::domain::{ConfidenceBound, ForecastResponse, Series, ValidationMetrics};
use crate::fit::Forecast;

/// Timestamp layout used on the wire. Fractional seconds are printed only when non-zero.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(WIRE_TIMESTAMP_FORMAT).to_string()
}

/// Shape the service response from the pipeline outputs.
pub fn assemble_response(series: &Series, forecast: &Forecast, metrics: &ValidationMetrics) -> ForecastResponse {
    let confidence_intervals = forecast
        .lower
        .iter()
        .zip(&forecast.upper)
        .map(|(&lower, &upper)| ConfidenceBound { lower, upper })
        .collect();

    ForecastResponse {
        historical_dates: series.points().iter().map(|p| format_timestamp(p.ds)).collect(),
        historical_prices: series.values(),
        forecast_dates: forecast.timestamps.iter().map(|&ts| format_timestamp(ts)).collect(),
        forecast_prices: forecast.yhat.clone(),
        confidence_intervals,
        metrics: metrics.clone(),
    }
}
