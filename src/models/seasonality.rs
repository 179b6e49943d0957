//! Seasonal components and the built-in defaults.
//!
//! Defaults are switched on from the shape of the history:
//!
//! - `yearly` (order 10) when the history spans at least two years
//! - `weekly` (order 3) when it spans at least two weeks and is sampled more
//!   often than weekly
//! - `daily` (order 4) when it spans at least two days and is sampled intraday
//!
//! An explicitly added component with the same name replaces the default.

use chrono::NaiveDateTime;

use crate::models::model::elapsed_seconds;

const YEARLY_PERIOD: f64 = 365.25;
const WEEKLY_PERIOD: f64 = 7.0;
const DAILY_PERIOD: f64 = 1.0;

const YEARLY_ORDER: usize = 10;
const WEEKLY_ORDER: usize = 3;
const DAILY_ORDER: usize = 4;

/// One periodic component, approximated by `fourier_order` harmonics.
#[derive(Debug, Clone, PartialEq)]
pub struct Seasonality {
    pub name: String,
    /// Period in days.
    pub period: f64,
    pub fourier_order: usize,
    pub prior_scale: f64,
}

impl Seasonality {
    pub fn new(name: impl Into<String>, period: f64, fourier_order: usize, prior_scale: f64) -> Self {
        Self {
            name: name.into(),
            period,
            fourier_order,
            prior_scale,
        }
    }

    /// Number of design-matrix columns this component occupies.
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }
}

/// Default components enabled for a history with these timestamps.
///
/// `ds` must be sorted ascending.
pub fn default_seasonalities(ds: &[NaiveDateTime], prior_scale: f64) -> Vec<Seasonality> {
    let (Some(first), Some(last)) = (ds.first(), ds.last()) else {
        return Vec::new();
    };

    let span_days = elapsed_seconds(*first, *last) / 86_400.0;
    let min_spacing_days = ds
        .windows(2)
        .map(|w| elapsed_seconds(w[0], w[1]) / 86_400.0)
        .fold(f64::INFINITY, f64::min);

    let mut out = Vec::new();
    if span_days >= 2.0 * YEARLY_PERIOD.floor() {
        out.push(Seasonality::new("yearly", YEARLY_PERIOD, YEARLY_ORDER, prior_scale));
    }
    if span_days >= 2.0 * WEEKLY_PERIOD && min_spacing_days < WEEKLY_PERIOD {
        out.push(Seasonality::new("weekly", WEEKLY_PERIOD, WEEKLY_ORDER, prior_scale));
    }
    if span_days >= 2.0 * DAILY_PERIOD && min_spacing_days < DAILY_PERIOD {
        out.push(Seasonality::new("daily", DAILY_PERIOD, DAILY_ORDER, prior_scale));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn grid(n: usize, step: Duration) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        (0..n).map(|i| start + step * i as i32).collect()
    }

    fn names(s: &[Seasonality]) -> Vec<&str> {
        s.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn forty_days_enables_weekly_only() {
        let ds = grid(40, Duration::days(1));
        assert_eq!(names(&default_seasonalities(&ds, 10.0)), vec!["weekly"]);
    }

    #[test]
    fn short_minute_history_enables_nothing() {
        let ds = grid(300, Duration::minutes(1));
        assert!(default_seasonalities(&ds, 10.0).is_empty());
    }

    #[test]
    fn three_days_of_hours_enables_daily() {
        let ds = grid(72, Duration::hours(1));
        assert_eq!(names(&default_seasonalities(&ds, 10.0)), vec!["daily"]);
    }

    #[test]
    fn three_years_of_days_enables_yearly_and_weekly() {
        let ds = grid(3 * 365, Duration::days(1));
        assert_eq!(names(&default_seasonalities(&ds, 10.0)), vec!["yearly", "weekly"]);
    }
}
