use crate::database::models::DailySchedule;
use crate::error::{Error, Result};
use crate::utils::time::parse_clock_time;
use chrono::NaiveDate;

pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if birth_date > today {
        return Err(Error::BirthDateInFuture(birth_date));
    }
    Ok(())
}

pub fn validate_work_start(birth_date: NaiveDate, work_start: Option<NaiveDate>) -> Result<()> {
    match work_start {
        Some(work_start) if work_start < birth_date => Err(Error::WorkStartBeforeBirth {
            birth: birth_date,
            work_start,
        }),
        _ => Ok(()),
    }
}

/// Rejects inverted or impossible profile dates before they reach the resolver.
pub fn validate_profile_dates(
    birth_date: NaiveDate,
    work_start: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<()> {
    validate_birth_date(birth_date, today)?;
    validate_work_start(birth_date, work_start)
}

pub fn validate_date_not_future(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date > today {
        return Err(Error::FutureDate(date));
    }
    Ok(())
}

pub fn validate_schedule(schedule: &DailySchedule) -> Result<()> {
    for time in [
        &schedule.work_start_time,
        &schedule.work_end_time,
        &schedule.sleep_time,
        &schedule.wake_up_time,
    ] {
        parse_clock_time(time)?;
    }
    Ok(())
}

pub fn validate_hours(hours: f64) -> Result<f64> {
    if !(0.0..=24.0).contains(&hours) {
        return Err(Error::InvalidHours(hours));
    }
    Ok(hours)
}
