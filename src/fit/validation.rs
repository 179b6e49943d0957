//! Accuracy metrics on the chronological validation prefix.
//!
//! A fresh model with the same configuration is fit on the first
//! `validation_fraction` of the series and scored on that same prefix, so the
//! numbers measure in-sample fit quality.

use tracing::debug;

use crate::domain::{Series, ValidationMetrics};
use crate::error::AppError;
use crate::fit::fitter::fit_model;
use crate::math::{mean_absolute_error, mean_absolute_percentage_error};
use crate::models::ModelSpec;

const PERIOD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn validate_prefix(spec: &ModelSpec, series: &Series, fraction: f64) -> Result<ValidationMetrics, AppError> {
    let len = (series.len() as f64 * fraction).floor() as usize;
    let prefix = series.prefix(len);
    let (Some(first), Some(last)) = (prefix.first(), prefix.last()) else {
        return Err(AppError::internal("Validation window is empty."));
    };

    let model = fit_model(spec, &prefix)?;

    let actual = prefix.values();
    let predicted = model.predict_many(&prefix.timestamps());

    let mae = mean_absolute_error(&actual, &predicted);
    let mape = mean_absolute_percentage_error(&actual, &predicted) * 100.0;
    if !(mae.is_finite() && mape.is_finite()) {
        return Err(AppError::internal("Non-finite validation metrics."));
    }

    let validation_period = format!(
        "{} to {}",
        first.ds.format(PERIOD_FORMAT),
        last.ds.format(PERIOD_FORMAT)
    );
    debug!(points = prefix.len(), mae, mape, %validation_period, "validation prefix scored");

    Ok(ValidationMetrics {
        mae,
        mape,
        validation_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecasterConfig, Frequency, SeriesPoint};
    use crate::fit::configure::configure_model;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(16, 0, 0).unwrap();
        Series::from_sorted(
            values
                .iter()
                .enumerate()
                .map(|(i, &y)| SeriesPoint {
                    ds: start + Duration::days(i as i64),
                    y,
                })
                .collect(),
        )
    }

    fn spec() -> ModelSpec {
        configure_model(Frequency::Days(1), &ForecasterConfig::default())
    }

    #[test]
    fn constant_series_scores_zero() {
        let metrics = validate_prefix(&spec(), &series(&[100.0; 40]), 0.8).unwrap();
        assert!(metrics.mae < 1e-6);
        assert!(metrics.mape < 1e-6);
    }

    #[test]
    fn window_covers_the_first_eighty_percent() {
        let metrics = validate_prefix(&spec(), &series(&[50.0; 40]), 0.8).unwrap();
        // 40 points -> 32 in the prefix: 2024-02-01 .. 2024-03-03.
        assert_eq!(metrics.validation_period, "2024-02-01 16:00:00 to 2024-03-03 16:00:00");
    }

    #[test]
    fn metrics_are_non_negative_and_finite() {
        let values: Vec<f64> = (0..50)
            .map(|i| 20.0 + (i as f64 * 0.9).sin() * 2.0 + i as f64 * 0.1)
            .collect();
        let metrics = validate_prefix(&spec(), &series(&values), 0.8).unwrap();
        assert!(metrics.mae.is_finite() && metrics.mae >= 0.0);
        assert!(metrics.mape.is_finite() && metrics.mape >= 0.0);
    }
}
