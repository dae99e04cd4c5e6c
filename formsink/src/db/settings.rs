//! Settings table access
//!
//! Read/write settings from the settings table (key-value store). All
//! settings are global to the gateway, not per-sheet.

use sqlx::{Pool, Sqlite};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Key holding the bound backing-spreadsheet identifier
pub const SPREADSHEET_ID_KEY: &str = "spreadsheet_id";

/// The spreadsheet this gateway appends to, if bound
pub async fn spreadsheet_binding(db: &Pool<Sqlite>) -> Result<Option<String>> {
    get_setting::<String>(db, SPREADSHEET_ID_KEY).await
}

/// Bind the gateway to a backing spreadsheet (one-time administrative step)
pub async fn bind_spreadsheet(db: &Pool<Sqlite>, spreadsheet_id: &str) -> Result<()> {
    if spreadsheet_id.trim().is_empty() {
        return Err(Error::Config("Spreadsheet identifier is empty".to_string()));
    }
    set_setting(db, SPREADSHEET_ID_KEY, spreadsheet_id).await
}

/// Generic setting getter
///
/// Returns None if the key doesn't exist. Parses the stored value from its
/// string form using FromStr.
pub async fn get_setting<T: FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    value
        .map(|s| {
            s.parse::<T>().map_err(|_| {
                Error::Config(format!("Setting '{}' has unparseable value: {}", key, s))
            })
        })
        .transpose()
}

/// Generic setting setter (insert or update)
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await?;

    Ok(())
}
