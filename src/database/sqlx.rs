use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;

/// Opens (creating if needed) the SQLite database and applies the schema.
///
/// In-memory URLs get a single long-lived connection so every query sees the
/// same database.
pub async fn db_connection(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Connected to SQLite database at {database_url}");

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bins (
            bin_id TEXT PRIMARY KEY,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            fill_level REAL NOT NULL DEFAULT 0,
            collector_id TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS route_stops (
            collector_id TEXT NOT NULL,
            bin_id TEXT NOT NULL,
            stop_order INTEGER NOT NULL,
            status TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            assigned_at INTEGER NOT NULL,
            PRIMARY KEY (collector_id, bin_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    debug!("Schema is up to date");
    Ok(())
}
