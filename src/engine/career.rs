//! Lifetime projection of work, sleep and free time between the start of a
//! career and retirement.
//!
//! Historical daily records give per-category averages. Those averages are
//! applied to every elapsed working day ("spent") and to every day left until
//! retirement ("remaining"), whether or not a record exists for that day.

use crate::clock::Clock;
use crate::database::models::{DailySchedule, DailyTimeRecord, TimeSlice, UserProfile};
use crate::engine::daily::{calculate_sleep_hours, calculate_work_hours};
use crate::error::Result;
use crate::utils::time::{add_years, start_of_day, MILLIS_PER_DAY};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const DEFAULT_WORK_START_AGE: i32 = 22;
pub const DEFAULT_CATEGORY_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourAverages {
    pub work: f64,
    pub sleep: f64,
    pub free: f64,
}

impl HourAverages {
    pub fn from_records(records: &[DailyTimeRecord]) -> Self {
        if records.is_empty() {
            return Self {
                work: DEFAULT_CATEGORY_HOURS,
                sleep: DEFAULT_CATEGORY_HOURS,
                free: DEFAULT_CATEGORY_HOURS,
            };
        }

        let count = records.len() as f64;
        let (work, sleep, free) = records.iter().fold((0.0, 0.0, 0.0), |acc, record| {
            (
                acc.0 + record.time_data.work.hours,
                acc.1 + record.time_data.sleep.hours,
                acc.2 + record.time_data.free.hours,
            )
        });

        Self {
            work: work / count,
            sleep: sleep / count,
            free: free / count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerTimeDistribution {
    pub spent_work: TimeSlice,
    pub spent_sleep: TimeSlice,
    pub spent_free: TimeSlice,
    pub remaining_work: TimeSlice,
    pub remaining_sleep: TimeSlice,
    pub remaining_free: TimeSlice,
    pub unspent_time: TimeSlice,
    pub total_days: i64,
    pub worked_days: i64,
    pub remaining_days: i64,
    pub historical_days_count: usize,
    pub averages: HourAverages,
}

impl CareerTimeDistribution {
    pub fn spent_hours(&self) -> f64 {
        self.spent_work.hours + self.spent_sleep.hours + self.spent_free.hours
    }
}

/// Work start date, defaulting to the 22nd birthday when none is recorded.
pub fn resolve_work_start_date(profile: &UserProfile) -> NaiveDate {
    profile
        .work_start_date
        .unwrap_or_else(|| add_years(profile.birth_date, DEFAULT_WORK_START_AGE))
}

fn whole_days_since(from: NaiveDate, now: NaiveDateTime) -> i64 {
    now.signed_duration_since(start_of_day(from)).num_days().max(0)
}

pub fn calculate_career_time_distribution(
    profile: &UserProfile,
    records: &[DailyTimeRecord],
    clock: &dyn Clock,
) -> CareerTimeDistribution {
    let work_start = resolve_work_start_date(profile);
    let now = clock.now();

    let total_days = profile
        .retirement_date
        .signed_duration_since(work_start)
        .num_days()
        .max(0);
    let worked_days = whole_days_since(work_start, now);
    let remaining_days = (total_days - worked_days).max(0);

    let averages = HourAverages::from_records(records);

    let spent = |avg: f64| avg * worked_days as f64;
    let remaining = |avg: f64| avg * remaining_days as f64;

    let spent_hours = [spent(averages.work), spent(averages.sleep), spent(averages.free)];
    let remaining_hours = [
        remaining(averages.work),
        remaining(averages.sleep),
        remaining(averages.free),
    ];
    let unspent_hours: f64 = remaining_hours.iter().sum();
    let grand_total = spent_hours.iter().sum::<f64>() + unspent_hours;

    let slice = |hours: f64| {
        let percentage = if grand_total > 0.0 {
            hours / grand_total * 100.0
        } else {
            0.0
        };
        TimeSlice::new(hours, percentage)
    };

    tracing::debug!(
        "Career projection: total_days={}, worked_days={}, remaining_days={}, records={}",
        total_days,
        worked_days,
        remaining_days,
        records.len()
    );

    CareerTimeDistribution {
        spent_work: slice(spent_hours[0]),
        spent_sleep: slice(spent_hours[1]),
        spent_free: slice(spent_hours[2]),
        remaining_work: slice(remaining_hours[0]),
        remaining_sleep: slice(remaining_hours[1]),
        remaining_free: slice(remaining_hours[2]),
        unspent_time: slice(unspent_hours),
        total_days,
        worked_days,
        remaining_days,
        historical_days_count: records.len(),
        averages,
    }
}

/// Aggregate view over raw daily schedules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAnalysis {
    pub total_work_hours: f64,
    pub total_sleep_hours: f64,
    pub total_free_hours: f64,
    pub average_work_hours: f64,
    pub average_sleep_hours: f64,
    pub average_free_hours: f64,
    pub days_until_retirement: i64,
    pub free_time_until_retirement: f64,
}

/// Days left until retirement, rounding a partial day up.
pub fn days_until_retirement(profile: &UserProfile, clock: &dyn Clock) -> i64 {
    let millis = start_of_day(profile.retirement_date)
        .signed_duration_since(clock.now())
        .num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0);
    days.max(0)
}

pub fn calculate_time_analysis(
    schedules: &[DailySchedule],
    profile: &UserProfile,
    clock: &dyn Clock,
) -> Result<TimeAnalysis> {
    let days_until_retirement = days_until_retirement(profile, clock);

    if schedules.is_empty() {
        return Ok(TimeAnalysis {
            total_work_hours: 0.0,
            total_sleep_hours: 0.0,
            total_free_hours: 0.0,
            average_work_hours: 0.0,
            average_sleep_hours: 0.0,
            average_free_hours: 0.0,
            days_until_retirement,
            free_time_until_retirement: 0.0,
        });
    }

    let mut total_work_hours = 0.0;
    let mut total_sleep_hours = 0.0;
    let mut total_free_hours = 0.0;

    for schedule in schedules {
        let work = calculate_work_hours(schedule)?;
        let sleep = calculate_sleep_hours(schedule)?;
        total_work_hours += work;
        total_sleep_hours += sleep;
        // Not clamped here, an overrunning day lowers the free average.
        total_free_hours += 24.0 - work - sleep;
    }

    let count = schedules.len() as f64;
    let average_free_hours = total_free_hours / count;

    Ok(TimeAnalysis {
        total_work_hours,
        total_sleep_hours,
        total_free_hours,
        average_work_hours: total_work_hours / count,
        average_sleep_hours: total_sleep_hours / count,
        average_free_hours,
        days_until_retirement,
        free_time_until_retirement: average_free_hours * days_until_retirement as f64,
    })
}
