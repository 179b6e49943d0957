//! Export forecast responses (JSON) and backtest predictions (CSV).

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::app::backtest::BacktestOutput;
use crate::domain::ForecastResponse;
use crate::error::AppError;
use crate::report::format_timestamp;

/// Write the forecast response exactly as the service would return it.
pub fn write_forecast_json(path: &Path, response: &ForecastResponse) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, response)
        .map_err(|e| AppError::internal(format!("Failed to write export JSON: {e}")))
}

#[derive(Serialize)]
struct BacktestRow {
    timestamp: String,
    actual: f64,
    predicted: f64,
    error: f64,
}

/// One row per held-out quote: `timestamp,actual,predicted,error`.
pub fn write_backtest_csv(path: &Path, output: &BacktestOutput) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for ((ts, &actual), &predicted) in output.timestamps.iter().zip(&output.actual).zip(&output.predicted) {
        writer
            .serialize(BacktestRow {
                timestamp: format_timestamp(*ts),
                actual,
                predicted,
                error: predicted - actual,
            })
            .map_err(|e| AppError::internal(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::internal(format!("Failed to flush export CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfidenceBound, ValidationMetrics};
    use chrono::NaiveDate;

    #[test]
    fn forecast_json_matches_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.json");
        let response = ForecastResponse {
            historical_dates: vec!["2024-01-01T00:00:00".to_string()],
            historical_prices: vec![100.0],
            forecast_dates: vec!["2024-01-02T00:00:00".to_string()],
            forecast_prices: vec![101.0],
            confidence_intervals: vec![ConfidenceBound { lower: 99.0, upper: 103.0 }],
            metrics: ValidationMetrics {
                mae: 0.5,
                mape: 0.4,
                validation_period: "2024-01-01 00:00:00 to 2024-01-01 00:00:00".to_string(),
            },
        };

        write_forecast_json(&path, &response).unwrap();
        let back: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["forecast_prices"][0], 101.0);
        assert_eq!(back["confidence_intervals"][0]["upper"], 103.0);
        assert_eq!(back["metrics"]["mae"], 0.5);
    }

    #[test]
    fn backtest_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backtest.csv");
        let ts = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(15, 30, 0).unwrap();
        let output = BacktestOutput {
            symbol: "MSFT".to_string(),
            quotes_used: 10,
            train_len: 8,
            timestamps: vec![ts],
            actual: vec![10.0],
            predicted: vec![10.5],
            mae: 0.5,
            mape: 5.0,
            rmse: 0.5,
        };

        write_backtest_csv(&path, &output).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("timestamp,actual,predicted,error"));
        assert_eq!(lines.next(), Some("2024-01-05T15:30:00,10.0,10.5,0.5"));
        assert_eq!(lines.next(), None);
    }
}
