//! Formatted terminal output for the CLI.

use crate::app::backtest::BacktestOutput;
use crate::app::pipeline::RunOutput;
use crate::report::format_timestamp;

/// Format the forecast run summary (series stats, model setup, forecast table, metrics).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== sf - Stock Price Forecast ===\n");

    if let (Some(first), Some(last)) = (run.series.first(), run.series.last()) {
        let values = run.series.values();
        let y_min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.push_str(&format!(
            "History: n={} | {} .. {} | close=[{:.2}, {:.2}]\n",
            run.series.len(),
            format_timestamp(first.ds),
            format_timestamp(last.ds),
            y_min,
            y_max
        ));
    }

    let fallback = if run.frequency_inferred { "" } else { " (default)" };
    out.push_str(&format!("Frequency: {}{fallback}\n", run.frequency.label()));

    let model = &run.model;
    out.push_str("\nModel:\n");
    out.push_str(&format!(
        "- changepoints: {} in first {:.0}% | prior={}\n",
        model.changepoints.len(),
        run.spec.changepoint_range * 100.0,
        run.spec.changepoint_prior_scale
    ));
    for s in &model.seasonalities {
        let origin = if run.spec.seasonality(&s.name).is_some() { "" } else { " (default)" };
        out.push_str(&format!(
            "- seasonality {:<8} period={:>6.2}d order={}{origin}\n",
            s.name, s.period, s.fourier_order
        ));
    }
    out.push_str(&format!(
        "- interval: {:.0}% from {} samples (seed {})\n",
        run.spec.interval_width * 100.0,
        run.spec.uncertainty_samples,
        run.spec.seed
    ));

    out.push_str("\nForecast:\n");
    out.push_str(&format!("{:<20} {:>12} {:>12} {:>12}\n", "date", "yhat", "lower", "upper"));
    out.push_str(&format!("{:-<20} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for i in 0..run.forecast.len() {
        out.push_str(&format!(
            "{:<20} {:>12.4} {:>12.4} {:>12.4}\n",
            format_timestamp(run.forecast.timestamps[i]),
            run.forecast.yhat[i],
            run.forecast.lower[i],
            run.forecast.upper[i]
        ));
    }

    out.push_str("\nValidation:\n");
    out.push_str(&format!("- period: {}\n", run.metrics.validation_period));
    out.push_str(&format!("- MAE : {:.4}\n", run.metrics.mae));
    out.push_str(&format!("- MAPE: {:.4}%\n", run.metrics.mape));

    out
}

/// Format the backtest summary and the tail of its predictions.
pub fn format_backtest_summary(output: &BacktestOutput, tail: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== sf - Intraday backtest ({}) ===\n", output.symbol));
    out.push_str(&format!(
        "Quotes: {} | train={} | test={}\n",
        output.quotes_used,
        output.train_len,
        output.actual.len()
    ));
    out.push_str(&format!(
        "MAE={:.4} MAPE={:.4}% RMSE={:.4}\n",
        output.mae, output.mape, output.rmse
    ));

    if tail > 0 && !output.actual.is_empty() {
        out.push('\n');
        out.push_str(&format!("{:<20} {:>12} {:>12}\n", "time", "actual", "predicted"));
        out.push_str(&format!("{:-<20} {:-<12} {:-<12}\n", "", "", ""));
        let skip = output.actual.len().saturating_sub(tail);
        for ((ts, a), p) in output
            .timestamps
            .iter()
            .zip(&output.actual)
            .zip(&output.predicted)
            .skip(skip)
        {
            out.push_str(&format!("{:<20} {a:>12.4} {p:>12.4}\n", format_timestamp(*ts)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_forecast;
    use crate::domain::{ForecastRequest, ForecasterConfig, HistoricalPoint};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn run_summary_reports_fitted_components() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let historical_data = (0..30)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5 + (i as f64).sin();
                HistoricalPoint {
                    date: (start + Duration::days(i)).format("%Y-%m-%d").to_string(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1.0,
                }
            })
            .collect();
        let request = ForecastRequest {
            historical_data,
            forecast_days: None,
        };
        let run = run_forecast(&request, &ForecasterConfig::default()).unwrap();

        let text = format_run_summary(&run);
        // 30 points -> 24 in the changepoint range -> 23 changepoints.
        assert!(text.contains("changepoints: 23 in first 80%"), "{text}");
        assert!(text.contains("seasonality monthly"));
        assert!(text.contains("seasonality weekly"));
        assert!(text.contains("(default)"));
    }

    #[test]
    fn backtest_summary_shows_only_the_tail() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(15, 0, 0).unwrap();
        let output = BacktestOutput {
            symbol: "AAPL".to_string(),
            quotes_used: 20,
            train_len: 16,
            timestamps: (0..4).map(|i| start + Duration::minutes(i)).collect(),
            actual: vec![1.0, 2.0, 3.0, 4.0],
            predicted: vec![1.5, 2.5, 3.5, 4.5],
            mae: 0.5,
            mape: 20.8333,
            rmse: 0.5,
        };

        let text = format_backtest_summary(&output, 2);
        assert!(text.contains("(AAPL)"));
        assert!(text.contains("train=16 | test=4"));
        assert!(!text.contains("2024-01-05T15:01:00"));
        assert!(text.contains("2024-01-05T15:02:00"));
        assert!(text.contains("2024-01-05T15:03:00"));
    }
}
