use crate::clock::Clock;
use crate::database::models::UserProfile;
use crate::engine::career::resolve_work_start_date;
use crate::utils::time::{parse_date, start_of_day, DATE_ERROR, MILLIS_PER_DAY};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const RETIRED: &str = "Retired!";

const DAYS_PER_MONTH: f64 = 30.44;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownUnit {
    Years,
    Months,
    #[default]
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl CountdownUnit {
    pub const ALL: [CountdownUnit; 7] = [
        CountdownUnit::Years,
        CountdownUnit::Months,
        CountdownUnit::Days,
        CountdownUnit::Hours,
        CountdownUnit::Minutes,
        CountdownUnit::Seconds,
        CountdownUnit::Milliseconds,
    ];

    /// Unknown names fall back to days.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "years" => CountdownUnit::Years,
            "months" => CountdownUnit::Months,
            "days" => CountdownUnit::Days,
            "hours" => CountdownUnit::Hours,
            "minutes" => CountdownUnit::Minutes,
            "seconds" => CountdownUnit::Seconds,
            "milliseconds" => CountdownUnit::Milliseconds,
            _ => CountdownUnit::Days,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownUnit::Years => "years",
            CountdownUnit::Months => "months",
            CountdownUnit::Days => "days",
            CountdownUnit::Hours => "hours",
            CountdownUnit::Minutes => "minutes",
            CountdownUnit::Seconds => "seconds",
            CountdownUnit::Milliseconds => "milliseconds",
        }
    }

    /// How often a live display in this unit needs refreshing.
    pub fn refresh_interval(&self) -> Duration {
        match self {
            CountdownUnit::Milliseconds => Duration::from_millis(1),
            CountdownUnit::Seconds => Duration::from_secs(1),
            CountdownUnit::Minutes => Duration::from_secs(60),
            CountdownUnit::Hours => Duration::from_secs(3600),
            _ => Duration::from_secs(60),
        }
    }
}

impl fmt::Display for CountdownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining(i64),
    Retired,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining(n) => write!(f, "{}", n),
            Countdown::Retired => f.write_str(RETIRED),
        }
    }
}

/// Remaining time until midnight of `retirement_date`, truncated to `unit`.
pub fn time_until(retirement_date: NaiveDate, unit: CountdownUnit, now: NaiveDateTime) -> Countdown {
    let millis = start_of_day(retirement_date)
        .signed_duration_since(now)
        .num_milliseconds();

    if millis <= 0 {
        return Countdown::Retired;
    }

    let days = millis / MILLIS_PER_DAY;
    let value = match unit {
        CountdownUnit::Milliseconds => millis,
        CountdownUnit::Seconds => millis / 1000,
        CountdownUnit::Minutes => millis / 60_000,
        CountdownUnit::Hours => millis / 3_600_000,
        CountdownUnit::Days => days,
        CountdownUnit::Months => (days as f64 / DAYS_PER_MONTH).floor() as i64,
        CountdownUnit::Years => (days as f64 / DAYS_PER_YEAR).floor() as i64,
    };
    Countdown::Remaining(value)
}

pub fn format_time_until_retirement(
    profile: &UserProfile,
    unit: CountdownUnit,
    clock: &dyn Clock,
) -> String {
    time_until(profile.retirement_date, unit, clock.now()).to_string()
}

/// Countdown text for a stored date string; corrupted dates yield the
/// date-error sentinel.
pub fn format_countdown_from_str(retirement_date: &str, unit: CountdownUnit, clock: &dyn Clock) -> String {
    match parse_date(retirement_date) {
        Ok(date) => time_until(date, unit, clock.now()).to_string(),
        Err(e) => {
            tracing::warn!("Cannot compute countdown: {}", e);
            DATE_ERROR.to_string()
        }
    }
}

/// Share of the career already worked, as a percentage in `[0, 100]`.
pub fn progress_between(work_start: NaiveDate, retirement_date: NaiveDate, now: NaiveDateTime) -> f64 {
    let start = start_of_day(work_start);
    let end = start_of_day(retirement_date);

    if now < start {
        return 0.0;
    }
    if now >= end {
        return 100.0;
    }

    let total = end.signed_duration_since(start).num_milliseconds() as f64;
    let worked = now.signed_duration_since(start).num_milliseconds() as f64;
    (worked / total).clamp(0.0, 1.0) * 100.0
}

/// Like [`progress_between`] over stored date strings; unparseable input gives 0.
pub fn progress_from_str(work_start: &str, retirement_date: &str, now: NaiveDateTime) -> f64 {
    match (parse_date(work_start), parse_date(retirement_date)) {
        (Ok(start), Ok(end)) => progress_between(start, end, now),
        _ => 0.0,
    }
}

pub fn calculate_retirement_progress(profile: &UserProfile, clock: &dyn Clock) -> f64 {
    progress_between(
        resolve_work_start_date(profile),
        profile.retirement_date,
        clock.now(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_units() {
        let retirement = date(2026, 1, 1);
        // 366 days, 1 hour, 1 minute, 1 second before
        let now = at(2024, 12, 30, 22, 58, 59);
        let expected_millis = (366 * 86_400 + 3661) * 1000;

        let value = |unit| time_until(retirement, unit, now);
        assert_eq!(value(CountdownUnit::Milliseconds), Countdown::Remaining(expected_millis));
        assert_eq!(value(CountdownUnit::Seconds), Countdown::Remaining(expected_millis / 1000));
        assert_eq!(value(CountdownUnit::Minutes), Countdown::Remaining(366 * 1440 + 61));
        assert_eq!(value(CountdownUnit::Hours), Countdown::Remaining(366 * 24 + 1));
        assert_eq!(value(CountdownUnit::Days), Countdown::Remaining(366));
        assert_eq!(value(CountdownUnit::Months), Countdown::Remaining(12));
        assert_eq!(value(CountdownUnit::Years), Countdown::Remaining(1));
    }

    #[test]
    fn test_month_and_year_approximation() {
        let now = at(2024, 1, 1, 0, 0, 0);
        // 365 days is less than 365.25
        assert_eq!(
            time_until(date(2024, 12, 31), CountdownUnit::Years, now),
            Countdown::Remaining(0)
        );
        // 30 days is less than 30.44
        assert_eq!(
            time_until(date(2024, 1, 31), CountdownUnit::Months, now),
            Countdown::Remaining(0)
        );
        assert_eq!(
            time_until(date(2024, 2, 1), CountdownUnit::Months, now),
            Countdown::Remaining(1)
        );
    }

    #[test]
    fn test_retired_for_every_unit() {
        let retirement = date(2020, 1, 1);
        for now in [at(2020, 1, 1, 0, 0, 0), at(2023, 5, 5, 12, 0, 0)] {
            for unit in CountdownUnit::ALL {
                assert_eq!(time_until(retirement, unit, now), Countdown::Retired);
                assert_eq!(time_until(retirement, unit, now).to_string(), RETIRED);
            }
        }
    }

    #[test]
    fn test_unit_parsing_falls_back_to_days() {
        assert_eq!(CountdownUnit::parse_lossy("Hours"), CountdownUnit::Hours);
        assert_eq!(CountdownUnit::parse_lossy("fortnights"), CountdownUnit::Days);
        assert_eq!(CountdownUnit::parse_lossy(""), CountdownUnit::Days);
    }

    #[test]
    fn test_refresh_intervals() {
        assert_eq!(CountdownUnit::Milliseconds.refresh_interval(), Duration::from_millis(1));
        assert_eq!(CountdownUnit::Seconds.refresh_interval(), Duration::from_secs(1));
        assert_eq!(CountdownUnit::Hours.refresh_interval(), Duration::from_secs(3600));
        assert_eq!(CountdownUnit::Years.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_countdown_from_corrupted_string() {
        let clock = FixedClock::on(date(2024, 1, 1));
        assert_eq!(format_countdown_from_str("garbage", CountdownUnit::Days, &clock), DATE_ERROR);
        assert_eq!(format_countdown_from_str("2024-01-11", CountdownUnit::Days, &clock), "10");
    }

    #[test]
    fn test_progress_clamp_and_monotonic() {
        let start = date(2020, 1, 1);
        let end = date(2030, 1, 1);

        assert_eq!(progress_between(start, end, at(2019, 12, 31, 23, 59, 59)), 0.0);
        assert_eq!(progress_between(start, end, at(2030, 1, 1, 0, 0, 0)), 100.0);
        assert_eq!(progress_between(start, end, at(2035, 1, 1, 0, 0, 0)), 100.0);

        let mut previous = 0.0;
        for year in 2021..2030 {
            let progress = progress_between(start, end, at(year, 6, 1, 0, 0, 0));
            assert!(progress > 0.0 && progress < 100.0);
            assert!(progress > previous);
            previous = progress;
        }
    }

    #[test]
    fn test_progress_from_corrupted_strings() {
        let now = at(2025, 1, 1, 0, 0, 0);
        assert_eq!(progress_from_str("bad", "2030-01-01", now), 0.0);
        assert_eq!(progress_from_str("2020-01-01", "", now), 0.0);
        let progress = progress_from_str("2020-01-01", "2030-01-01", now);
        assert!((progress - 1827.0 / 3653.0 * 100.0).abs() < 1e-9);
    }
}
