//! Command-line parsing for the stock forecaster.
//!
//! Argument parsing lives here; dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sf", version, about = "Stock price forecasting service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP forecasting service.
    Serve(ServeArgs),
    /// Forecast from a local JSON or CSV file and print a summary.
    Forecast(ForecastArgs),
    /// Backtest the windowed sequence model on live intraday quotes.
    ///
    /// Requires `ALPHAVANTAGE_API_KEY` in the environment or `.env`.
    Backtest(BacktestArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides HOST).
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Request file: a JSON request body, a JSON array of points, or a CSV with
    /// `date,open,high,low,close,volume` columns.
    pub input: PathBuf,

    /// Forecast horizon (1-5; defaults to 5, larger values are clamped).
    #[arg(short, long, allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// Seed for interval simulation (overrides FORECAST_SEED).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the response JSON to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct BacktestArgs {
    /// Ticker symbol.
    #[arg(short, long, default_value = "AAPL")]
    pub symbol: String,

    /// Intraday bar interval (1min, 5min, 15min, 30min, 60min).
    #[arg(long, default_value = "1min")]
    pub interval: String,

    /// Quotes per input window.
    #[arg(long, default_value_t = 60)]
    pub lookback: usize,

    /// Number of trailing predictions to print.
    #[arg(long, default_value_t = 10)]
    pub tail: usize,

    /// Write held-out predictions to this CSV path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_accepts_negative_days() {
        let cli = Cli::parse_from(["sf", "forecast", "prices.csv", "--days", "-2"]);
        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.input, PathBuf::from("prices.csv"));
                assert_eq!(args.days, Some(-2));
                assert!(args.export.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn backtest_defaults() {
        let cli = Cli::parse_from(["sf", "backtest"]);
        match cli.command {
            Command::Backtest(args) => {
                assert_eq!(args.symbol, "AAPL");
                assert_eq!(args.interval, "1min");
                assert_eq!(args.lookback, 60);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
