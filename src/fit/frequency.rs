//! Sampling-frequency inference.
//!
//! Rules, in order:
//!
//! 1. fewer than 3 timestamps: no frequency
//! 2. all consecutive gaps equal: weeks / days / hours / minutes / seconds,
//!    picking the largest unit the gap is a whole multiple of
//! 3. business-daily (Mon–Fri, same time of day, 1-day gaps plus Friday→Monday
//!    weekend gaps): business days
//! 4. anything else: no frequency
//!
//! Callers treat "no frequency" as daily (`Frequency::default()`).

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

use crate::domain::Frequency;

const SECOND: i64 = 1;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Infer the dominant sampling interval of ascending timestamps.
pub fn infer_frequency(ds: &[NaiveDateTime]) -> Option<Frequency> {
    if ds.len() < 3 {
        return None;
    }

    let gaps: Vec<Duration> = ds.windows(2).map(|w| w[1] - w[0]).collect();
    let first = gaps[0];

    if gaps.iter().all(|g| *g == first) {
        return regular_frequency(first);
    }

    if is_business_daily(ds, &gaps) {
        return Some(Frequency::BusinessDays);
    }

    None
}

fn regular_frequency(gap: Duration) -> Option<Frequency> {
    // Sub-second or non-positive spacing is never a regular frequency here.
    if gap.subsec_nanos() != 0 {
        return None;
    }
    let secs = gap.num_seconds();
    if secs <= 0 {
        return None;
    }

    let count = |unit: i64| u32::try_from(secs / unit).ok();
    if secs % WEEK == 0 {
        count(WEEK).map(Frequency::Weeks)
    } else if secs % DAY == 0 {
        count(DAY).map(Frequency::Days)
    } else if secs % HOUR == 0 {
        count(HOUR).map(Frequency::Hours)
    } else if secs % MINUTE == 0 {
        count(MINUTE).map(Frequency::Minutes)
    } else {
        count(SECOND).map(Frequency::Seconds)
    }
}

fn is_business_daily(ds: &[NaiveDateTime], gaps: &[Duration]) -> bool {
    let time_of_day = ds[0].time();
    let weekday_only = ds
        .iter()
        .all(|ts| ts.time() == time_of_day && !matches!(ts.weekday(), Weekday::Sat | Weekday::Sun));
    if !weekday_only {
        return false;
    }

    ds.windows(2).zip(gaps).all(|(w, gap)| {
        let days = gap.num_days();
        days == 1 || (days == 3 && w[0].weekday() == Weekday::Fri)
    })
}
