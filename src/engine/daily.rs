use crate::database::models::{DailySchedule, TimeData, TimeSlice};
use crate::error::Result;
use crate::utils::time::parse_clock_time;
use chrono::{Datelike, NaiveDate, Weekday};

/// Fixed public holidays as (month, day): New Year, Labour Day, National Day.
pub const HOLIDAYS: &[(u32, u32)] = &[(1, 1), (5, 1), (10, 1), (10, 2), (10, 3)];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS
        .iter()
        .any(|&(month, day)| date.month() == month && date.day() == day)
}

pub fn is_day_off(date: NaiveDate) -> bool {
    is_weekend(date) || is_holiday(date)
}

/// Hours between work start and end; an end before the start is an overnight shift.
pub fn calculate_work_hours(schedule: &DailySchedule) -> Result<f64> {
    let start = parse_clock_time(&schedule.work_start_time)?;
    let end = parse_clock_time(&schedule.work_end_time)?;

    let mut hours = end - start;
    if hours < 0.0 {
        hours += 24.0;
    }
    Ok(hours)
}

/// Hours between going to bed and waking up, crossing midnight when needed.
pub fn calculate_sleep_hours(schedule: &DailySchedule) -> Result<f64> {
    let sleep = parse_clock_time(&schedule.sleep_time)?;
    let wake = parse_clock_time(&schedule.wake_up_time)?;

    let mut hours = wake - sleep;
    if hours <= 0.0 {
        hours += 24.0;
    }
    Ok(hours)
}

fn default_distribution(date: NaiveDate) -> TimeData {
    if is_day_off(date) {
        TimeData {
            work: TimeSlice::new(0.0, 0.0),
            sleep: TimeSlice::new(8.0, 33.3),
            free: TimeSlice::new(16.0, 66.7),
        }
    } else {
        TimeData {
            work: TimeSlice::new(8.0, 33.3),
            sleep: TimeSlice::new(8.0, 33.3),
            free: TimeSlice::new(8.0, 33.3),
        }
    }
}

/// Work/sleep/free split for one day.
///
/// With a schedule the split is derived from its clock times. Without one,
/// weekends and holidays default to 0/8/16 hours and workdays to 8/8/8.
pub fn calculate_daily_time_distribution(
    schedule: Option<&DailySchedule>,
    date: NaiveDate,
) -> Result<TimeData> {
    let Some(schedule) = schedule else {
        return Ok(default_distribution(date));
    };

    let work_hours = calculate_work_hours(schedule)?;
    let sleep_hours = calculate_sleep_hours(schedule)?;
    Ok(TimeData::from_hours(work_hours, sleep_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(work_start: &str, work_end: &str, sleep: &str, wake: &str) -> DailySchedule {
        DailySchedule {
            date: date(2024, 3, 5),
            work_start_time: work_start.to_string(),
            work_end_time: work_end.to_string(),
            sleep_time: sleep.to_string(),
            wake_up_time: wake.to_string(),
            notes: None,
            created_at: date(2024, 3, 5).and_hms_opt(20, 0, 0).unwrap(),
        }
    }

    fn assert_full_day(data: &TimeData) {
        assert!((data.total_hours() - 24.0).abs() < 1e-9);
        let pct = data.work.percentage + data.sleep.percentage + data.free.percentage;
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_regular_schedule() {
        let s = schedule("09:00", "18:00", "23:00", "07:00");
        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();

        assert_eq!(data.work.hours, 9.0);
        assert_eq!(data.sleep.hours, 8.0);
        assert_eq!(data.free.hours, 7.0);
        assert_eq!(data.work.percentage, 37.5);
        assert_full_day(&data);
    }

    #[test]
    fn test_overnight_shift() {
        let s = schedule("22:00", "06:30", "08:00", "15:00");
        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();

        assert_eq!(data.work.hours, 8.5);
        assert_eq!(data.sleep.hours, 7.0);
        assert_eq!(data.free.hours, 8.5);
        assert_full_day(&data);
    }

    #[test]
    fn test_schedule_grid_always_fills_the_day() {
        // Every 90 minutes across the day, as unpadded H:M
        let times: Vec<String> = (0..16)
            .map(|i| format!("{}:{:02}", i * 3 / 2, (i % 2) * 30))
            .collect();

        for work_start in &times {
            for work_end in &times {
                for sleep in &times {
                    for wake in &times {
                        let s = schedule(work_start, work_end, sleep, wake);
                        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();

                        assert!(data.work.hours >= 0.0 && data.work.hours < 24.0);
                        assert!(data.sleep.hours > 0.0 && data.sleep.hours <= 24.0);
                        if data.work.hours + data.sleep.hours <= 24.0 {
                            assert_full_day(&data);
                        } else {
                            assert_eq!(data.free.hours, 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_shift_ending_at_midnight() {
        let s = schedule("15:00", "24:00", "1:00", "9:00");
        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();
        assert_eq!(data.work.hours, 9.0);
        assert_eq!(data.sleep.hours, 8.0);
        assert_full_day(&data);
    }

    #[test]
    fn test_sleep_equal_times_counts_full_day() {
        let s = schedule("09:00", "09:00", "23:00", "23:00");
        assert_eq!(calculate_sleep_hours(&s).unwrap(), 24.0);
        assert_eq!(calculate_work_hours(&s).unwrap(), 0.0);

        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();
        assert_eq!(data.free.hours, 0.0);
    }

    #[test]
    fn test_overrun_clamps_free_time() {
        let s = schedule("06:00", "22:00", "22:00", "08:00");
        let data = calculate_daily_time_distribution(Some(&s), s.date).unwrap();
        assert_eq!(data.work.hours, 16.0);
        assert_eq!(data.sleep.hours, 10.0);
        assert_eq!(data.free.hours, 0.0);
    }

    #[test]
    fn test_invalid_clock_time_is_reported() {
        let s = schedule("9am", "18:00", "23:00", "07:00");
        assert_eq!(
            calculate_daily_time_distribution(Some(&s), s.date),
            Err(Error::InvalidClockTime("9am".to_string()))
        );
    }

    #[test]
    fn test_weekend_default() {
        // 2024-03-09 is a Saturday
        let data = calculate_daily_time_distribution(None, date(2024, 3, 9)).unwrap();
        assert_eq!(data.work, TimeSlice::new(0.0, 0.0));
        assert_eq!(data.sleep, TimeSlice::new(8.0, 33.3));
        assert_eq!(data.free, TimeSlice::new(16.0, 66.7));
    }

    #[test]
    fn test_holiday_default() {
        // 2025-01-01 is a Wednesday
        let data = calculate_daily_time_distribution(None, date(2025, 1, 1)).unwrap();
        assert_eq!(data.work.hours, 0.0);
        assert_eq!(data.free.hours, 16.0);

        assert!(is_holiday(date(2023, 10, 3)));
        assert!(!is_holiday(date(2023, 10, 4)));
    }

    #[test]
    fn test_workday_default() {
        // 2024-03-06 is a Wednesday
        let data = calculate_daily_time_distribution(None, date(2024, 3, 6)).unwrap();
        assert_eq!(data.work, TimeSlice::new(8.0, 33.3));
        assert_eq!(data.sleep, TimeSlice::new(8.0, 33.3));
        assert_eq!(data.free, TimeSlice::new(8.0, 33.3));
    }
}
