//! Error types for formsink
//!
//! Defines the gateway error taxonomy using thiserror for clear error
//! propagation. Every variant is caught at the submission coordinator
//! boundary and converted to a structured error outcome.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the formsink gateway
#[derive(Error, Debug)]
pub enum Error {
    /// Exclusive submission lock not acquired within the bounded wait
    #[error("Lock timeout: submission lock not acquired within {0:?}")]
    LockTimeout(Duration),

    /// Target sheet name has no matching sheet in the bound spreadsheet
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Failure writing the row or forcing the cell format
    #[error("Store write error: {0}")]
    StoreWrite(String),

    /// Failure reading from the backing store (headers, row index, open)
    #[error("Store error: {0}")]
    Store(String),

    /// Settings database errors (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Outbound notification delivery error (logged, never surfaced)
    #[error("Notification error: {0}")]
    Notify(String),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using formsink Error
pub type Result<T> = std::result::Result<T, Error>;
