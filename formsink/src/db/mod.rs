//! Settings database
//!
//! A small SQLite database holds the gateway's persistent key-value
//! settings, most importantly the administrative binding to the backing
//! spreadsheet. The submission pipeline reads the binding on every request;
//! it is written once by the `bind-store` tool.

pub mod settings;

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::{Error, Result};

/// Open (creating if missing) the settings database at the given path
pub async fn connect(db_path: &Path) -> Result<Pool<Sqlite>> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| Error::Config(format!("Non-UTF8 database path: {:?}", db_path)))?;

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path_str))
        .map_err(Error::Database)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create required tables if they do not exist
pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Settings database initialized");
    Ok(())
}
