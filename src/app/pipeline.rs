//! Forecast pipeline shared by the HTTP service and the CLI:
//! normalize -> infer frequency -> configure -> fit -> forecast -> validate

use tracing::info;

use crate::domain::{ForecastRequest, ForecastResponse, ForecasterConfig, Frequency, Series, ValidationMetrics};
use crate::error::AppError;
use crate::fit::{Forecast, configure_model, fit_model, forecast, infer_frequency, validate_prefix};
use crate::io::ingest::normalize;
use crate::models::{FittedModel, ModelSpec};

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: Series,
    pub frequency: Frequency,
    /// `false` when the frequency fell back to the daily default.
    pub frequency_inferred: bool,
    pub spec: ModelSpec,
    /// The fit on the full history (resolved seasonalities, placed changepoints).
    pub model: FittedModel,
    pub forecast: Forecast,
    pub metrics: ValidationMetrics,
}

/// Execute the full forecast pipeline and return the computed outputs.
pub fn run_forecast(request: &ForecastRequest, config: &ForecasterConfig) -> Result<RunOutput, AppError> {
    info!(points = request.historical_data.len(), "Received stock prediction request");

    // 1) Canonical series.
    let series = normalize(&request.historical_data, config.min_points)?;
    let horizon = request.horizon()?;

    // 2) Sampling frequency.
    let inferred = infer_frequency(&series.timestamps());
    let frequency = inferred.unwrap_or_default();
    info!(frequency = %frequency, inferred = inferred.is_some(), "Inferred data frequency");

    // 3) Configure and fit on the full history.
    let spec = configure_model(frequency, config);
    let model = fit_model(&spec, &series)?;

    // 4) Forecast the horizon after the last observation.
    let last = series
        .last()
        .ok_or_else(|| AppError::internal("Normalized series is empty."))?;
    let future = frequency.future_timestamps(last.ds, horizon);
    let forecast = forecast(&model, &future)?;

    // 5) Score the validation prefix with a separate fit.
    let metrics = validate_prefix(&spec, &series, config.validation_fraction)?;
    info!(
        horizon = forecast.len(),
        mae = metrics.mae,
        mape = metrics.mape,
        "Forecast complete"
    );

    Ok(RunOutput {
        series,
        frequency,
        frequency_inferred: inferred.is_some(),
        spec,
        model,
        forecast,
        metrics,
    })
}

/// Run the pipeline and shape the service response.
pub fn forecast_response(request: &ForecastRequest, config: &ForecasterConfig) -> Result<ForecastResponse, AppError> {
    let run = run_forecast(request, config)?;
    Ok(crate::report::assemble_response(&run.series, &run.forecast, &run.metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoricalPoint;
    use crate::error::ErrorKind;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn points(n: usize, step: Duration, close: impl Fn(usize) -> f64) -> Vec<HistoricalPoint> {
        (0..n)
            .map(|i| {
                let c = close(i);
                HistoricalPoint {
                    date: (start() + step * i as i32).format("%Y-%m-%dT%H:%M:%S").to_string(),
                    open: c,
                    high: c,
                    low: c,
                    close: c,
                    volume: 1_000.0,
                }
            })
            .collect()
    }

    fn request(historical_data: Vec<HistoricalPoint>, forecast_days: Option<i64>) -> ForecastRequest {
        ForecastRequest {
            historical_data,
            forecast_days,
        }
    }

    fn wavy(i: usize) -> f64 {
        150.0 + 0.2 * i as f64 + 3.0 * (i as f64 * 0.7).sin()
    }

    #[test]
    fn horizon_is_clamped_to_five() {
        let config = ForecasterConfig::default();
        let resp = forecast_response(&request(points(45, Duration::days(1), wavy), Some(20)), &config).unwrap();
        assert_eq!(resp.forecast_dates.len(), 5);

        let resp = forecast_response(&request(points(45, Duration::days(1), wavy), Some(3)), &config).unwrap();
        assert_eq!(resp.forecast_dates.len(), 3);
    }

    #[test]
    fn forecast_arrays_are_aligned() {
        let config = ForecasterConfig::default();
        let resp = forecast_response(&request(points(60, Duration::minutes(1), wavy), None), &config).unwrap();
        assert_eq!(resp.forecast_dates.len(), resp.forecast_prices.len());
        assert_eq!(resp.forecast_prices.len(), resp.confidence_intervals.len());
        assert_eq!(resp.historical_dates.len(), resp.historical_prices.len());
    }

    #[test]
    fn daily_data_uses_monthly_branch() {
        let config = ForecasterConfig::default();
        let run = run_forecast(&request(points(40, Duration::days(1), wavy), None), &config).unwrap();
        assert_eq!(run.frequency, Frequency::Days(1));
        assert!(run.frequency_inferred);
        assert!(run.spec.seasonality("monthly").is_some());
        assert!(run.spec.seasonality("daily").is_none());
    }

    #[test]
    fn minute_data_uses_daily_weekly_branch() {
        let config = ForecasterConfig::default();
        let run = run_forecast(&request(points(90, Duration::minutes(1), wavy), None), &config).unwrap();
        assert_eq!(run.frequency, Frequency::Minutes(1));
        assert!(run.spec.seasonality("daily").is_some());
        assert!(run.spec.seasonality("weekly").is_some());
        assert_eq!(
            run.forecast.timestamps[0],
            start() + Duration::minutes(90),
            "first forecast step follows the last observation"
        );
    }

    #[test]
    fn constant_prices_forecast_flat() {
        let config = ForecasterConfig::default();
        let resp = forecast_response(&request(points(40, Duration::days(1), |_| 100.0), Some(5)), &config).unwrap();

        assert_eq!(resp.forecast_prices.len(), 5);
        for (price, ci) in resp.forecast_prices.iter().zip(&resp.confidence_intervals) {
            assert!((price - 100.0).abs() < 1e-4, "forecast {price}");
            assert!(ci.lower <= *price && *price <= ci.upper);
        }
        assert!(resp.metrics.mae < 1e-6);
        assert!(resp.metrics.mape < 1e-6);
        assert_eq!(resp.forecast_dates[0], "2024-02-10T00:00:00");
    }

    #[test]
    fn millisecond_spacing_is_forecast() {
        let history: Vec<HistoricalPoint> = (0..40)
            .map(|i| HistoricalPoint {
                date: (start() + Duration::milliseconds(10 * i))
                    .format("%Y-%m-%dT%H:%M:%S%.3f")
                    .to_string(),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume: 10.0,
            })
            .collect();
        let config = ForecasterConfig::default();
        let run = run_forecast(&request(history, None), &config).unwrap();

        assert_eq!(run.series.len(), 40);
        assert_eq!(run.forecast.len(), 5);
        for h in 0..run.forecast.len() {
            assert!((run.forecast.yhat[h] - 100.0).abs() < 1e-3, "forecast {}", run.forecast.yhat[h]);
            assert!(run.forecast.lower[h].is_finite() && run.forecast.upper[h].is_finite());
        }
        assert!(run.metrics.mae < 1e-6);

        let resp = crate::report::assemble_response(&run.series, &run.forecast, &run.metrics);
        assert_eq!(resp.historical_dates[1], "2024-01-01T00:00:00.010");
    }

    #[test]
    fn too_few_points_is_a_validation_error() {
        let config = ForecasterConfig::default();
        let err = forecast_response(&request(points(29, Duration::days(1), wavy), None), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("30"));
    }

    #[test]
    fn response_round_trips_into_a_new_request() {
        let config = ForecasterConfig::default();
        let first = forecast_response(&request(points(50, Duration::days(1), wavy), None), &config).unwrap();

        let replay: Vec<HistoricalPoint> = first
            .historical_dates
            .iter()
            .zip(&first.historical_prices)
            .map(|(date, &close)| HistoricalPoint {
                date: date.clone(),
                open: 0.0,
                high: 0.0,
                low: 0.0,
                close,
                volume: 0.0,
            })
            .collect();

        let second = forecast_response(&request(replay, None), &config).unwrap();
        assert_eq!(second.historical_dates, first.historical_dates);
        assert_eq!(second.forecast_dates.len(), second.confidence_intervals.len());
        assert_eq!(second.forecast_prices.len(), 5);
    }
}
