//! Model configuration from the inferred frequency.
//!
//! - sub-daily data (`T`, `5T`, `15T`, `H`): daily (order 15) + weekly (order 5)
//! - everything else: monthly (period 30.5, order 5)

use crate::domain::{ForecasterConfig, Frequency};
use crate::models::ModelSpec;

pub const DAILY_FOURIER_ORDER: usize = 15;
pub const WEEKLY_FOURIER_ORDER: usize = 5;
pub const MONTHLY_PERIOD: f64 = 30.5;
pub const MONTHLY_FOURIER_ORDER: usize = 5;

/// Build the forecaster for a series sampled at `frequency`.
pub fn configure_model(frequency: Frequency, config: &ForecasterConfig) -> ModelSpec {
    let mut spec = ModelSpec::new(config);
    if frequency.is_sub_daily() {
        spec.add_seasonality("daily", 1.0, DAILY_FOURIER_ORDER)
            .add_seasonality("weekly", 7.0, WEEKLY_FOURIER_ORDER);
    } else {
        spec.add_seasonality("monthly", MONTHLY_PERIOD, MONTHLY_FOURIER_ORDER);
    }
    spec
}
