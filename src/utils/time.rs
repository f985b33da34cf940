use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_NOT_SET: &str = "not set";
pub const DATE_ERROR: &str = "date error";

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parses `H:M` into a fractional hour, e.g. `"09:30"` is `9.5`.
///
/// Only the shape is checked: two integers around a single `:`. Values past
/// a day such as `"24:00"` are accepted as written.
pub fn parse_clock_time(time_str: &str) -> Result<f64> {
    let time_str = time_str.trim();
    let invalid = || Error::InvalidClockTime(time_str.to_string());

    let (hours, minutes) = time_str.split_once(':').ok_or_else(invalid)?;
    if minutes.contains(':') {
        return Err(invalid());
    }
    let hours: i64 = hours.trim().parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.trim().parse().map_err(|_| invalid())?;

    Ok(hours as f64 + minutes as f64 / 60.0)
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let date_str = date_str.trim();
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(date_str.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a possibly missing, possibly corrupted stored date for display.
pub fn safe_format_date(date_str: Option<&str>) -> String {
    match date_str {
        None => DATE_NOT_SET.to_string(),
        Some(s) if s.trim().is_empty() => DATE_NOT_SET.to_string(),
        Some(s) => match parse_date(s) {
            Ok(date) => format_date(date),
            Err(e) => {
                tracing::warn!("Failed to format date: {}", e);
                DATE_ERROR.to_string()
            }
        },
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The UTC instant of local midnight on `date`. A midnight skipped by a DST
/// change resolves to the first hour that exists.
pub fn local_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    let midnight = start_of_day(date);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Whole years elapsed between `birth_date` and `today`.
pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Builds a date from a possibly out-of-range day, letting the excess
/// roll into the following month (Feb 29 in a common year becomes Mar 1).
fn rollover_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day.saturating_sub(1)))))
        .unwrap_or(NaiveDate::MAX)
}

/// Shifts the year field only.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    rollover_date(date.year() + years, date.month(), date.day())
}

/// Shifts the month field, carrying into the year; day overflow rolls over.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    rollover_date(year, month, date.day())
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

pub fn is_yesterday(date: NaiveDate, today: NaiveDate) -> bool {
    today.pred_opt() == Some(date)
}

/// Short label for a past date: "today", "yesterday", "N days ago" within a
/// week, otherwise the date itself.
pub fn relative_date_label(date: NaiveDate, today: NaiveDate) -> String {
    if is_today(date, today) {
        return "today".to_string();
    }
    if is_yesterday(date, today) {
        return "yesterday".to_string();
    }

    let days_ago = today.signed_duration_since(date).num_days();
    if (0..7).contains(&days_ago) {
        format!("{} days ago", days_ago)
    } else {
        format_date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("09:30").unwrap(), 9.5);
        assert_eq!(parse_clock_time("00:00").unwrap(), 0.0);
        assert_eq!(parse_clock_time(" 23:45 ").unwrap(), 23.75);
        assert_eq!(
            parse_clock_time("nine"),
            Err(Error::InvalidClockTime("nine".to_string()))
        );
        assert!(parse_clock_time("").is_err());
        assert!(parse_clock_time("09:30:00").is_err());
        assert!(parse_clock_time("09:").is_err());
    }

    #[test]
    fn test_parse_clock_time_accepts_unpadded_and_end_of_day() {
        assert_eq!(parse_clock_time("24:00"), Ok(24.0));
        assert_eq!(parse_clock_time("9:30"), Ok(9.5));
        assert_eq!(parse_clock_time("7:05"), Ok(7.0 + 5.0 / 60.0));
    }

    #[test]
    fn test_calculate_age() {
        let birth = date(1990, 6, 15);
        assert_eq!(calculate_age(birth, date(2020, 6, 14)), 29);
        assert_eq!(calculate_age(birth, date(2020, 6, 15)), 30);
        assert_eq!(calculate_age(birth, date(2020, 12, 1)), 30);
        assert_eq!(calculate_age(birth, date(2021, 1, 1)), 30);
    }

    #[test]
    fn test_add_years() {
        assert_eq!(add_years(date(1990, 1, 1), 60), date(2050, 1, 1));
        // Feb 29 rolls forward in a common year
        assert_eq!(add_years(date(2000, 2, 29), 1), date(2001, 3, 1));
        assert_eq!(add_years(date(2000, 2, 29), 4), date(2004, 2, 29));
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(date(2050, 1, 1), 60), date(2055, 1, 1));
        assert_eq!(add_months(date(2020, 11, 15), 3), date(2021, 2, 15));
        assert_eq!(add_months(date(2021, 1, 31), 1), date(2021, 3, 3));
        assert_eq!(add_months(date(2021, 3, 15), -3), date(2020, 12, 15));
    }

    #[test]
    fn test_local_midnight_utc_round_trips_to_local_midnight() {
        let instant = local_midnight_utc(date(2055, 1, 1));
        assert_eq!(instant.with_timezone(&Local).naive_local(), start_of_day(date(2055, 1, 1)));
    }

    #[test]
    fn test_safe_format_date() {
        assert_eq!(safe_format_date(None), DATE_NOT_SET);
        assert_eq!(safe_format_date(Some("2055-01-01")), "2055-01-01");
        assert_eq!(safe_format_date(Some("not-a-date")), DATE_ERROR);
    }

    #[test]
    fn test_relative_date_label() {
        let today = date(2024, 3, 10);
        assert_eq!(relative_date_label(today, today), "today");
        assert_eq!(relative_date_label(date(2024, 3, 9), today), "yesterday");
        assert_eq!(relative_date_label(date(2024, 3, 6), today), "4 days ago");
        assert_eq!(relative_date_label(date(2024, 2, 1), today), "2024-02-01");
    }
}
