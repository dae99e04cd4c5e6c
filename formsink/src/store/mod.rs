//! Tabular store interface
//!
//! The backing spreadsheet is an external collaborator reached through the
//! narrow trait surface below: open a spreadsheet by its bound identifier,
//! resolve a sheet by name, then read the header row / last populated row
//! and write a single new row. All row indices are 1-based, with row 1
//! holding the column headers.
//!
//! Two implementations are provided: [`rest::RestSheetStore`] talks to a
//! sheets-bridge HTTP service, and [`memory::MemorySheetStore`] keeps sheets
//! in process memory with the same semantics.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

pub use memory::MemorySheetStore;
pub use rest::RestSheetStore;

/// A single cell value destined for the store.
///
/// `Text` carries submitter-controlled content and is the only variant the
/// sanitizer rewrites; `Timestamp` and `Id` are generated server-side and
/// bypass sanitization by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Id(Uuid),
}

impl CellValue {
    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// A one-row cell range, addressed by row index and width in columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRange {
    /// 1-based row index
    pub row: u32,
    /// Number of columns, starting at column 1
    pub width: u32,
}

/// Entry point to the backing store
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Open the spreadsheet with the given identifier
    async fn open(&self, id: &str) -> Result<Box<dyn SpreadsheetHandle>>;
}

/// An open spreadsheet
#[async_trait]
pub trait SpreadsheetHandle: Send + Sync {
    /// Resolve a sheet by name; `None` if no sheet with that name exists
    async fn sheet(&self, name: &str) -> Result<Option<Box<dyn Sheet>>>;
}

/// A named sheet within an open spreadsheet
#[async_trait]
pub trait Sheet: Send + Sync {
    /// Column names from row 1, in column order
    async fn header_row(&self) -> Result<Vec<String>>;

    /// Index of the last populated row (1 when only the header row exists)
    async fn last_row_index(&self) -> Result<u32>;

    /// Force the given range to plain-text format before values are written,
    /// so the store never evaluates the incoming strings as formulas
    async fn set_plain_text_format(&self, range: RowRange) -> Result<()>;

    /// Write values into the given row, starting at column 1
    async fn write_row(&self, row: u32, values: &[CellValue]) -> Result<()>;
}
