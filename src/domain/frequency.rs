//! Sampling frequency of a price series.
//!
//! Labels use the pandas offset aliases (`T`, `5T`, `H`, `D`, `B`, `W`, ...)
//! because clients and logs already speak that vocabulary.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
    /// Monday to Friday, skipping weekends.
    BusinessDays,
    Weeks(u32),
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Days(1)
    }
}

impl Frequency {
    pub fn label(self) -> String {
        fn alias(n: u32, unit: &str) -> String {
            if n == 1 { unit.to_string() } else { format!("{n}{unit}") }
        }
        match self {
            Frequency::Seconds(n) => alias(n, "S"),
            Frequency::Minutes(n) => alias(n, "T"),
            Frequency::Hours(n) => alias(n, "H"),
            Frequency::Days(n) => alias(n, "D"),
            Frequency::BusinessDays => "B".to_string(),
            Frequency::Weeks(n) => alias(n, "W"),
        }
    }

    /// Intraday frequencies that get the daily/weekly seasonal configuration.
    ///
    /// Only minute, 5-minute, 15-minute and hourly bars qualify; other intraday
    /// spacings are configured like daily data.
    pub fn is_sub_daily(self) -> bool {
        matches!(
            self,
            Frequency::Minutes(1) | Frequency::Minutes(5) | Frequency::Minutes(15) | Frequency::Hours(1)
        )
    }

    /// Timestamp one step after `ts`.
    pub fn advance(self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Frequency::Seconds(n) => ts + Duration::seconds(i64::from(n)),
            Frequency::Minutes(n) => ts + Duration::minutes(i64::from(n)),
            Frequency::Hours(n) => ts + Duration::hours(i64::from(n)),
            Frequency::Days(n) => ts + Duration::days(i64::from(n)),
            Frequency::Weeks(n) => ts + Duration::weeks(i64::from(n)),
            Frequency::BusinessDays => {
                let mut next = ts + Duration::days(1);
                while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                    next += Duration::days(1);
                }
                next
            }
        }
    }

    /// `count` timestamps continuing after `last`.
    pub fn future_timestamps(self, last: NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
        let mut out = Vec::with_capacity(count);
        let mut ts = last;
        for _ in 0..count {
            ts = self.advance(ts);
            out.push(ts);
        }
        out
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn labels_use_pandas_aliases() {
        assert_eq!(Frequency::Minutes(1).label(), "T");
        assert_eq!(Frequency::Minutes(15).label(), "15T");
        assert_eq!(Frequency::Hours(1).label(), "H");
        assert_eq!(Frequency::Days(1).label(), "D");
        assert_eq!(Frequency::BusinessDays.label(), "B");
        assert_eq!(Frequency::Weeks(2).label(), "2W");
        assert_eq!(Frequency::default().label(), "D");
    }

    #[test]
    fn only_listed_intraday_spacings_are_sub_daily() {
        assert!(Frequency::Minutes(1).is_sub_daily());
        assert!(Frequency::Minutes(5).is_sub_daily());
        assert!(Frequency::Minutes(15).is_sub_daily());
        assert!(Frequency::Hours(1).is_sub_daily());
        assert!(!Frequency::Minutes(30).is_sub_daily());
        assert!(!Frequency::Hours(2).is_sub_daily());
        assert!(!Frequency::Days(1).is_sub_daily());
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2024-01-05 is a Friday.
        let friday = at(2024, 1, 5, 16, 0);
        let next = Frequency::BusinessDays.future_timestamps(friday, 2);
        assert_eq!(next, vec![at(2024, 1, 8, 16, 0), at(2024, 1, 9, 16, 0)]);
    }

    #[test]
    fn future_timestamps_continue_after_last() {
        let last = at(2024, 3, 1, 9, 30);
        let next = Frequency::Minutes(5).future_timestamps(last, 3);
        assert_eq!(next, vec![at(2024, 3, 1, 9, 35), at(2024, 3, 1, 9, 40), at(2024, 3, 1, 9, 45)]);
    }
}
