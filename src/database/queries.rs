use crate::database::models::{DailySchedule, DailyTimeRecord, JobType, TimeData, TimeSlice, UserProfile};
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub const COUNTDOWN_UNIT_KEY: &str = "countdown_unit";

fn profile_from_row(row: &SqliteRow) -> Result<UserProfile> {
    let gender: String = row.try_get("gender")?;
    let job_type: String = row.try_get("job_type")?;
    let retirement_age: i64 = row.try_get("retirement_age")?;

    Ok(UserProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        gender: gender.parse()?,
        birth_date: row.try_get("birth_date")?,
        job_type: JobType::from_stored(&job_type),
        work_start_date: row.try_get("work_start_date")?,
        retirement_age: u32::try_from(retirement_age).context("stored retirement age out of range")?,
        retirement_date: row.try_get("retirement_date")?,
        profile_image: row.try_get("profile_image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn time_data_from_row(row: &SqliteRow) -> Result<TimeData> {
    Ok(TimeData {
        work: TimeSlice::new(row.try_get("work_hours")?, row.try_get("work_percentage")?),
        sleep: TimeSlice::new(row.try_get("sleep_hours")?, row.try_get("sleep_percentage")?),
        free: TimeSlice::new(row.try_get("free_hours")?, row.try_get("free_percentage")?),
    })
}

fn time_record_from_row(row: &SqliteRow) -> Result<DailyTimeRecord> {
    Ok(DailyTimeRecord {
        date: row.try_get("date")?,
        time_data: time_data_from_row(row)?,
        timestamp: row.try_get("timestamp")?,
    })
}

fn schedule_from_row(row: &SqliteRow) -> Result<DailySchedule> {
    Ok(DailySchedule {
        date: row.try_get("date")?,
        work_start_time: row.try_get("work_start_time")?,
        work_end_time: row.try_get("work_end_time")?,
        sleep_time: row.try_get("sleep_time")?,
        wake_up_time: row.try_get("wake_up_time")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

// Profile queries (one profile per installation)
pub async fn get_profile(pool: &SqlitePool) -> Result<Option<UserProfile>> {
    let row_opt = sqlx::query(
        "SELECT id, name, gender, birth_date, job_type, work_start_date, retirement_age,
                retirement_date, profile_image, created_at, updated_at
         FROM user_profile
         ORDER BY updated_at DESC
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    row_opt.as_ref().map(profile_from_row).transpose()
}

pub async fn save_profile(pool: &SqlitePool, profile: &UserProfile) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_profile WHERE id <> ?")
        .bind(&profile.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO user_profile (id, name, gender, birth_date, job_type, work_start_date,
                                   retirement_age, retirement_date, profile_image, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            gender = excluded.gender,
            birth_date = excluded.birth_date,
            job_type = excluded.job_type,
            work_start_date = excluded.work_start_date,
            retirement_age = excluded.retirement_age,
            retirement_date = excluded.retirement_date,
            profile_image = excluded.profile_image,
            updated_at = excluded.updated_at",
    )
    .bind(&profile.id)
    .bind(&profile.name)
    .bind(profile.gender.as_str())
    .bind(profile.birth_date)
    .bind(profile.job_type.as_str())
    .bind(profile.work_start_date)
    .bind(i64::from(profile.retirement_age))
    .bind(profile.retirement_date)
    .bind(&profile.profile_image)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

// Time record queries (one record per date, last write wins)
pub async fn save_time_record(pool: &SqlitePool, record: &DailyTimeRecord) -> Result<()> {
    let data = &record.time_data;

    sqlx::query(
        "INSERT INTO time_records (date, work_hours, work_percentage, sleep_hours, sleep_percentage,
                                   free_hours, free_percentage, timestamp)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(date) DO UPDATE SET
            work_hours = excluded.work_hours,
            work_percentage = excluded.work_percentage,
            sleep_hours = excluded.sleep_hours,
            sleep_percentage = excluded.sleep_percentage,
            free_hours = excluded.free_hours,
            free_percentage = excluded.free_percentage,
            timestamp = excluded.timestamp",
    )
    .bind(record.date)
    .bind(data.work.hours)
    .bind(data.work.percentage)
    .bind(data.sleep.hours)
    .bind(data.sleep.percentage)
    .bind(data.free.hours)
    .bind(data.free.percentage)
    .bind(record.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}

/// All records, newest first.
pub async fn get_all_time_records(pool: &SqlitePool) -> Result<Vec<DailyTimeRecord>> {
    let rows = sqlx::query(
        "SELECT date, work_hours, work_percentage, sleep_hours, sleep_percentage,
                free_hours, free_percentage, timestamp
         FROM time_records
         ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(time_record_from_row).collect()
}

pub async fn get_time_record_by_date(pool: &SqlitePool, date: NaiveDate) -> Result<Option<DailyTimeRecord>> {
    let row_opt = sqlx::query(
        "SELECT date, work_hours, work_percentage, sleep_hours, sleep_percentage,
                free_hours, free_percentage, timestamp
         FROM time_records
         WHERE date = ?",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    row_opt.as_ref().map(time_record_from_row).transpose()
}

/// Records dated within the last `days` days up to `today`, newest first.
pub async fn get_recent_time_records(
    pool: &SqlitePool,
    today: NaiveDate,
    days: u64,
) -> Result<Vec<DailyTimeRecord>> {
    let cutoff = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);

    let rows = sqlx::query(
        "SELECT date, work_hours, work_percentage, sleep_hours, sleep_percentage,
                free_hours, free_percentage, timestamp
         FROM time_records
         WHERE date >= ? AND date <= ?
         ORDER BY date DESC",
    )
    .bind(cutoff)
    .bind(today)
    .fetch_all(pool)
    .await?;

    rows.iter().map(time_record_from_row).collect()
}

// Daily schedule queries
pub async fn save_daily_schedule(pool: &SqlitePool, schedule: &DailySchedule) -> Result<()> {
    sqlx::query(
        "INSERT INTO daily_schedules (date, work_start_time, work_end_time, sleep_time, wake_up_time, notes, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(date) DO UPDATE SET
            work_start_time = excluded.work_start_time,
            work_end_time = excluded.work_end_time,
            sleep_time = excluded.sleep_time,
            wake_up_time = excluded.wake_up_time,
            notes = excluded.notes,
            created_at = excluded.created_at",
    )
    .bind(schedule.date)
    .bind(&schedule.work_start_time)
    .bind(&schedule.work_end_time)
    .bind(&schedule.sleep_time)
    .bind(&schedule.wake_up_time)
    .bind(&schedule.notes)
    .bind(schedule.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_all_daily_schedules(pool: &SqlitePool) -> Result<Vec<DailySchedule>> {
    let rows = sqlx::query(
        "SELECT date, work_start_time, work_end_time, sleep_time, wake_up_time, notes, created_at
         FROM daily_schedules
         ORDER BY date ASC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(schedule_from_row).collect()
}

pub async fn get_daily_schedule(pool: &SqlitePool, date: NaiveDate) -> Result<Option<DailySchedule>> {
    let row_opt = sqlx::query(
        "SELECT date, work_start_time, work_end_time, sleep_time, wake_up_time, notes, created_at
         FROM daily_schedules
         WHERE date = ?",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    row_opt.as_ref().map(schedule_from_row).transpose()
}

// In-progress day, promoted to a time record once the day is over
pub async fn save_pending_day(pool: &SqlitePool, data: &TimeData) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO pending_day (id, work_hours, work_percentage, sleep_hours,
                                             sleep_percentage, free_hours, free_percentage)
         VALUES (1, ?, ?, ?, ?, ?, ?)",
    )
    .bind(data.work.hours)
    .bind(data.work.percentage)
    .bind(data.sleep.hours)
    .bind(data.sleep.percentage)
    .bind(data.free.hours)
    .bind(data.free.percentage)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_pending_day(pool: &SqlitePool) -> Result<Option<TimeData>> {
    let row_opt = sqlx::query(
        "SELECT work_hours, work_percentage, sleep_hours, sleep_percentage, free_hours, free_percentage
         FROM pending_day
         WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    row_opt.as_ref().map(time_data_from_row).transpose()
}

/// Stores the pending day as yesterday's record unless yesterday already has one.
pub async fn finalize_previous_day(
    pool: &SqlitePool,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Result<Option<DailyTimeRecord>> {
    let Some(yesterday) = today.pred_opt() else {
        return Ok(None);
    };

    if get_time_record_by_date(pool, yesterday).await?.is_some() {
        return Ok(None);
    }

    let Some(time_data) = get_pending_day(pool).await? else {
        return Ok(None);
    };

    let record = DailyTimeRecord {
        date: yesterday,
        time_data,
        timestamp: now,
    };
    save_time_record(pool, &record).await?;
    tracing::info!("Saved pending day as time record for {}", yesterday);

    Ok(Some(record))
}

// Settings
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row_opt = sqlx::query("SELECT value FROM app_settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(match row_opt {
        Some(row) => Some(row.try_get("value")?),
        None => None,
    })
}

pub async fn put_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO app_settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn clear_all_data(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for table in ["user_profile", "time_records", "daily_schedules", "pending_day", "app_settings"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("Cleared all stored data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Gender, JobType};
    use crate::database::test_support::test_pool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, work: f64, sleep: f64) -> DailyTimeRecord {
        DailyTimeRecord {
            date: day,
            time_data: TimeData::from_hours(work, sleep),
            timestamp: day.and_hms_opt(23, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_time_record_last_write_wins() {
        let (_dir, pool) = test_pool().await;

        save_time_record(&pool, &record(date(2024, 3, 1), 8.0, 8.0)).await.unwrap();
        save_time_record(&pool, &record(date(2024, 3, 2), 9.0, 7.0)).await.unwrap();
        save_time_record(&pool, &record(date(2024, 3, 1), 10.0, 6.0)).await.unwrap();

        let records = get_all_time_records(&pool).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(2024, 3, 2));
        assert_eq!(records[1].time_data.work.hours, 10.0);

        let single = get_time_record_by_date(&pool, date(2024, 3, 1)).await.unwrap().unwrap();
        assert_eq!(single.time_data.sleep.hours, 6.0);
        assert!(get_time_record_by_date(&pool, date(2024, 3, 3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_time_records() {
        let (_dir, pool) = test_pool().await;
        for day in [date(2024, 1, 1), date(2024, 2, 20), date(2024, 3, 9)] {
            save_time_record(&pool, &record(day, 8.0, 8.0)).await.unwrap();
        }

        let recent = get_recent_time_records(&pool, date(2024, 3, 10), 30).await.unwrap();
        let dates: Vec<_> = recent.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 9), date(2024, 2, 20)]);
    }

    #[tokio::test]
    async fn test_profile_round_trip_keeps_single_row() {
        let (_dir, pool) = test_pool().await;
        assert!(get_profile(&pool).await.unwrap().is_none());

        let now = date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap();
        let mut profile = UserProfile {
            id: "first".to_string(),
            name: "Wang".to_string(),
            gender: Gender::Female,
            birth_date: date(1985, 5, 5),
            job_type: JobType::CivilServant,
            work_start_date: None,
            retirement_age: 60,
            retirement_date: date(2045, 5, 5),
            profile_image: Some("file:///bg.png".to_string()),
            created_at: now,
            updated_at: now,
        };
        save_profile(&pool, &profile).await.unwrap();
        assert_eq!(get_profile(&pool).await.unwrap(), Some(profile.clone()));

        profile.id = "second".to_string();
        profile.work_start_date = Some(date(2007, 9, 1));
        save_profile(&pool, &profile).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profile")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(get_profile(&pool).await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_finalize_previous_day() {
        let (_dir, pool) = test_pool().await;
        let today = date(2024, 3, 10);
        let now = today.and_hms_opt(7, 0, 0).unwrap();

        // Nothing pending yet
        assert!(finalize_previous_day(&pool, today, now).await.unwrap().is_none());

        save_pending_day(&pool, &TimeData::from_hours(9.0, 7.0)).await.unwrap();
        let saved = finalize_previous_day(&pool, today, now).await.unwrap().unwrap();
        assert_eq!(saved.date, date(2024, 3, 9));
        assert_eq!(saved.time_data.free.hours, 8.0);

        // A second call does not overwrite
        save_pending_day(&pool, &TimeData::from_hours(1.0, 1.0)).await.unwrap();
        assert!(finalize_previous_day(&pool, today, now).await.unwrap().is_none());
        let stored = get_time_record_by_date(&pool, date(2024, 3, 9)).await.unwrap().unwrap();
        assert_eq!(stored.time_data.work.hours, 9.0);
    }

    #[tokio::test]
    async fn test_settings_and_clear() {
        let (_dir, pool) = test_pool().await;
        assert!(get_setting(&pool, COUNTDOWN_UNIT_KEY).await.unwrap().is_none());

        put_setting(&pool, COUNTDOWN_UNIT_KEY, "hours").await.unwrap();
        put_setting(&pool, COUNTDOWN_UNIT_KEY, "seconds").await.unwrap();
        assert_eq!(get_setting(&pool, COUNTDOWN_UNIT_KEY).await.unwrap().as_deref(), Some("seconds"));

        save_time_record(&pool, &record(date(2024, 3, 1), 8.0, 8.0)).await.unwrap();
        clear_all_data(&pool).await.unwrap();
        assert!(get_all_time_records(&pool).await.unwrap().is_empty());
        assert!(get_setting(&pool, COUNTDOWN_UNIT_KEY).await.unwrap().is_none());
    }
}
