//! Offline backtest of a windowed sequence model on intraday quotes.
//!
//! Alpha Vantage fetch -> trailing 24h -> min-max scale -> 80/20 split ->
//! sliding windows -> autoregression -> predict the held-out tail -> metrics

use chrono::{Duration, NaiveDateTime};
use rayon::prelude::*;
use tracing::info;

use crate::data::AlphaVantageClient;
use crate::domain::SeriesPoint;
use crate::error::AppError;
use crate::math::{mean_absolute_error, mean_absolute_percentage_error, root_mean_squared_error};
use crate::sequence::{DEFAULT_PENALTY, MinMaxScaler, WindowRegressor, input_windows, sliding_windows};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub interval: String,
    /// Window length (number of previous quotes per prediction).
    pub lookback: usize,
    pub train_fraction: f64,
    /// Only quotes within this many hours of the latest one are used.
    pub window_hours: i64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            interval: "1min".to_string(),
            lookback: 60,
            train_fraction: 0.8,
            window_hours: 24,
        }
    }
}

/// Held-out predictions and their accuracy.
#[derive(Debug, Clone)]
pub struct BacktestOutput {
    pub symbol: String,
    pub quotes_used: usize,
    pub train_len: usize,
    pub timestamps: Vec<NaiveDateTime>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
}

/// Fetch quotes and run the backtest.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestOutput, AppError> {
    let client = AlphaVantageClient::from_env()?;
    let quotes = client.fetch_intraday(&config.symbol, &config.interval)?;
    backtest_quotes(&quotes, config)
}

/// Run the backtest on already fetched, ascending quotes.
pub fn backtest_quotes(quotes: &[SeriesPoint], config: &BacktestConfig) -> Result<BacktestOutput, AppError> {
    let Some(latest) = quotes.last() else {
        return Err(AppError::validation("No quotes to backtest."));
    };
    if config.lookback == 0 {
        return Err(AppError::input("Lookback must be > 0."));
    }
    if !(config.train_fraction > 0.0 && config.train_fraction < 1.0) {
        return Err(AppError::input("Train fraction must be in (0, 1)."));
    }

    let cutoff = latest.ds - Duration::hours(config.window_hours);
    let recent: Vec<SeriesPoint> = quotes.iter().filter(|q| q.ds > cutoff).copied().collect();
    let closes: Vec<f64> = recent.iter().map(|q| q.y).collect();
    let n = closes.len();

    let train_len = (n as f64 * config.train_fraction).ceil() as usize;
    if train_len <= config.lookback || train_len >= n {
        return Err(AppError::validation(format!(
            "Need more than {} quotes in the training split and at least one to test (have {n}, train {train_len}).",
            config.lookback
        )));
    }

    let scaler = MinMaxScaler::fit(&closes)?;
    let scaled = scaler.transform_all(&closes);

    let train = sliding_windows(&scaled[..train_len], config.lookback);
    let model = WindowRegressor::fit(&train, DEFAULT_PENALTY)?;

    // Test windows reach back `lookback` quotes into the training split.
    let test_inputs = input_windows(&scaled[train_len - config.lookback..], config.lookback);
    let predicted: Vec<f64> = test_inputs
        .par_iter()
        .map(|w| scaler.inverse_transform(model.predict(w)))
        .collect();

    let actual = closes[train_len..].to_vec();
    let timestamps = recent[train_len..].iter().map(|q| q.ds).collect();

    let mae = mean_absolute_error(&actual, &predicted);
    let mape = mean_absolute_percentage_error(&actual, &predicted) * 100.0;
    let rmse = root_mean_squared_error(&actual, &predicted);
    info!(
        symbol = %config.symbol,
        quotes = n,
        train = train_len,
        test = actual.len(),
        mae,
        mape,
        "backtest complete"
    );

    Ok(BacktestOutput {
        symbol: config.symbol.clone(),
        quotes_used: n,
        train_len,
        timestamps,
        actual,
        predicted,
        mae,
        mape,
        rmse,
    })
}
