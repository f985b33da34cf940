use crate::cli::App;
use crate::database::models::{DailySchedule, DailyTimeRecord, TimeData};
use crate::database::queries;
use crate::engine::daily::{calculate_daily_time_distribution, is_day_off};
use crate::utils::format::{format_history, format_success_message, format_time_data};
use crate::utils::validation::{validate_date_not_future, validate_hours, validate_schedule};
use anyhow::Result;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct ScheduleInput {
    pub date: Option<NaiveDate>,
    pub work_start: String,
    pub work_end: String,
    pub sleep: String,
    pub wake: String,
    pub notes: Option<String>,
}

/// Past days become finalized time records; today stays pending until tomorrow.
async fn store_day(app: &App, date: NaiveDate, time_data: TimeData) -> Result<&'static str> {
    if date == app.clock.today() {
        queries::save_pending_day(&app.pool, &time_data).await?;
        Ok("saved for today, finalized tomorrow")
    } else {
        let record = DailyTimeRecord {
            date,
            time_data,
            timestamp: app.clock.now(),
        };
        queries::save_time_record(&app.pool, &record).await?;
        Ok("saved to history")
    }
}

pub async fn record(app: &App, input: ScheduleInput) -> Result<String> {
    let today = app.clock.today();
    let date = input.date.unwrap_or(today);
    validate_date_not_future(date, today)?;

    let schedule = DailySchedule {
        date,
        work_start_time: input.work_start,
        work_end_time: input.work_end,
        sleep_time: input.sleep,
        wake_up_time: input.wake,
        notes: input.notes,
        created_at: app.clock.now(),
    };
    validate_schedule(&schedule)?;

    let time_data = calculate_daily_time_distribution(Some(&schedule), date)?;
    queries::save_daily_schedule(&app.pool, &schedule).await?;
    let outcome = store_day(app, date, time_data).await?;
    tracing::info!("Recorded schedule for {}", date);

    Ok(format!(
        "{}\n{}",
        format_success_message(&format!("Schedule {}", outcome)),
        format_time_data(date, &time_data)
    ))
}

/// Stores hand-adjusted hours for a day instead of clock times.
pub async fn adjust(app: &App, date: Option<NaiveDate>, work_hours: f64, sleep_hours: f64) -> Result<String> {
    let today = app.clock.today();
    let date = date.unwrap_or(today);
    validate_date_not_future(date, today)?;

    let time_data = TimeData::from_hours(validate_hours(work_hours)?, validate_hours(sleep_hours)?);
    let outcome = store_day(app, date, time_data).await?;

    Ok(format!(
        "{}\n{}",
        format_success_message(&format!("Hours {}", outcome)),
        format_time_data(date, &time_data)
    ))
}

pub async fn today(app: &App, date: Option<NaiveDate>) -> Result<String> {
    let date = date.unwrap_or_else(|| app.clock.today());
    let schedule = queries::get_daily_schedule(&app.pool, date).await?;

    let time_data = calculate_daily_time_distribution(schedule.as_ref(), date)?;
    let source = match (&schedule, is_day_off(date)) {
        (Some(_), _) => "from your schedule",
        (None, true) => "default for a day off",
        (None, false) => "default for a workday",
    };

    Ok(format!("{}\n   ({})", format_time_data(date, &time_data), source))
}

pub async fn history(app: &App, days: u64) -> Result<String> {
    let today = app.clock.today();
    let records = queries::get_recent_time_records(&app.pool, today, days).await?;
    Ok(format_history(&records, today))
}
