pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

pub async fn create_connection(database_url: &str) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url `{}`", database_url))?
        .create_if_missing(true);

    connect_with(connect_options).await
}

pub async fn connect_with(connect_options: SqliteConnectOptions) -> Result<SqlitePool> {
    let pool = SqlitePool::connect_with(connect_options).await?;

    // Run migrations
    migrations::run_migrations(&pool).await?;

    Ok(pool)
}
