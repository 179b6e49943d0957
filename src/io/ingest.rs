//! Input normalization.
//!
//! This module turns caller-supplied OHLCV points into a clean [`Series`] that
//! is safe to fit:
//!
//! - every date string becomes a timezone-naive timestamp
//! - duplicate timestamps are dropped (first occurrence wins)
//! - observations are sorted ascending
//! - series that are too short are rejected with a validation error
//!
//! It also loads requests from local files for the `sf forecast` command.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{ForecastRequest, HistoricalPoint, Series, SeriesPoint};
use crate::error::AppError;

/// Naive layouts tried after RFC 3339, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize historical points into an ascending, duplicate-free series.
pub fn normalize(points: &[HistoricalPoint], min_points: usize) -> Result<Series, AppError> {
    let mut seen = HashSet::with_capacity(points.len());
    let mut out = Vec::with_capacity(points.len());

    for point in points {
        let ds = parse_timestamp(&point.date)?;
        if seen.insert(ds) {
            out.push(SeriesPoint { ds, y: point.close });
        }
    }

    out.sort_by_key(|p| p.ds);

    if out.len() < min_points {
        return Err(AppError::validation(format!(
            "Need at least {min_points} data points"
        )));
    }

    Ok(Series::from_sorted(out))
}

/// Parse a date string into a timezone-naive timestamp.
///
/// Offsets are dropped and the local wall-clock time is kept.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AppError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(AppError::internal(format!("Unable to parse date '{raw}'")))
}

/// Load a forecast request from a local file.
///
/// - `.json`: either a full request object or a bare array of points
/// - `.csv`: header `date,open,high,low,close,volume`
///
/// `forecast_days` from the command line wins over a value in the file.
pub fn load_request(path: &Path, forecast_days: Option<i64>) -> Result<ForecastRequest, AppError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let mut request = if is_csv {
        ForecastRequest {
            historical_data: load_points_csv(path)?,
            forecast_days: None,
        }
    } else {
        load_request_json(path)?
    };

    if forecast_days.is_some() {
        request.forecast_days = forecast_days;
    }
    Ok(request)
}

fn load_request_json(path: &Path) -> Result<ForecastRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid JSON in '{}': {e}", path.display())))?;

    if value.is_array() {
        let historical_data: Vec<HistoricalPoint> = serde_json::from_value(value)
            .map_err(|e| AppError::input(format!("Invalid historical points: {e}")))?;
        return Ok(ForecastRequest {
            historical_data,
            forecast_days: None,
        });
    }

    serde_json::from_value(value).map_err(|e| AppError::input(format!("Invalid forecast request: {e}")))
}

fn load_points_csv(path: &Path) -> Result<Vec<HistoricalPoint>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut points = Vec::new();
    for (idx, row) in reader.deserialize::<HistoricalPoint>().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let point = row.map_err(|e| AppError::input(format!("CSV line {}: {e}", idx + 2)))?;
        points.push(point);
    }
    Ok(points)
}
