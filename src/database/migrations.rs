use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    create_user_profile_table(pool).await?;
    create_time_records_table(pool).await?;
    create_daily_schedules_table(pool).await?;
    create_pending_day_table(pool).await?;
    create_app_settings_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_user_profile_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profile (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            birth_date DATE NOT NULL,
            job_type TEXT NOT NULL,
            work_start_date DATE,
            retirement_age INTEGER NOT NULL,
            retirement_date DATE NOT NULL,
            profile_image TEXT,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_time_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_records (
            date DATE PRIMARY KEY,
            work_hours REAL NOT NULL,
            work_percentage REAL NOT NULL,
            sleep_hours REAL NOT NULL,
            sleep_percentage REAL NOT NULL,
            free_hours REAL NOT NULL,
            free_percentage REAL NOT NULL,
            timestamp DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_daily_schedules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_schedules (
            date DATE PRIMARY KEY,
            work_start_time TEXT NOT NULL,
            work_end_time TEXT NOT NULL,
            sleep_time TEXT NOT NULL,
            wake_up_time TEXT NOT NULL,
            notes TEXT,
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_pending_day_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pending_day (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            work_hours REAL NOT NULL,
            work_percentage REAL NOT NULL,
            sleep_hours REAL NOT NULL,
            sleep_percentage REAL NOT NULL,
            free_hours REAL NOT NULL,
            free_percentage REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_app_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
