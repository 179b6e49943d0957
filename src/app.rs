//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the tracing subscriber
//! - runs the HTTP service, a file-based forecast, or the intraday backtest
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::{BacktestArgs, Command, ForecastArgs, ServeArgs};
use crate::domain::ForecasterConfig;
use crate::error::AppError;
use crate::server::ServerConfig;

pub mod backtest;
pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "stock_forecast=info,tower_http=info";

/// Entry point for the `sf` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Backtest(args) => handle_backtest(args),
    }
}

/// Logs go to stderr so CLI summaries on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let mut server = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }
    let forecaster = ForecasterConfig::from_env()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(server, forecaster))
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let mut config = ForecasterConfig::from_env()?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let request = crate::io::ingest::load_request(&args.input, args.days)?;
    let run = pipeline::run_forecast(&request, &config)?;

    println!("{}", crate::report::format_run_summary(&run));

    if let Some(path) = &args.export {
        let response = crate::report::assemble_response(&run.series, &run.forecast, &run.metrics);
        crate::io::export::write_forecast_json(path, &response)?;
    }

    Ok(())
}

fn handle_backtest(args: BacktestArgs) -> Result<(), AppError> {
    let config = backtest::BacktestConfig {
        symbol: args.symbol,
        interval: args.interval,
        lookback: args.lookback,
        ..backtest::BacktestConfig::default()
    };
    let output = backtest::run_backtest(&config)?;

    println!("{}", crate::report::format_backtest_summary(&output, args.tail));

    if let Some(path) = &args.export {
        crate::io::export::write_backtest_csv(path, &output)?;
    }

    Ok(())
}

/// Rewrite argv so `sf` defaults to `sf serve`.
///
/// Rules:
/// - `sf`                      -> `sf serve`
/// - `sf --port 9000 ...`      -> `sf serve --port 9000 ...`
/// - `sf --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    if matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_serves() {
        assert_eq!(rewrite_args(args(&["sf"])), args(&["sf", "serve"]));
        assert_eq!(
            rewrite_args(args(&["sf", "--port", "9000"])),
            args(&["sf", "serve", "--port", "9000"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(args(&["sf", "--help"])), args(&["sf", "--help"]));
        assert_eq!(
            rewrite_args(args(&["sf", "forecast", "a.csv"])),
            args(&["sf", "forecast", "a.csv"])
        );
    }
}
