//! In-process tabular store
//!
//! Keeps sheets in memory behind an `RwLock`, with the same semantics as
//! the bridge-backed store: 1-based rows, headers in row 1, plain-text
//! format tracked per range. The test suites drive the full submission
//! pipeline against this store; it is also handy for local experiments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

use super::{CellValue, RowRange, Sheet, SheetStore, SpreadsheetHandle};

#[derive(Debug, Default)]
struct SheetData {
    headers: Vec<String>,
    /// Data rows, index 0 holding sheet row 2
    rows: Vec<Vec<CellValue>>,
    /// Ranges that have been forced to plain-text format
    plain_text_ranges: Vec<RowRange>,
}

/// Shared in-memory spreadsheet; clones share the same sheets
#[derive(Clone, Default)]
pub struct MemorySheetStore {
    sheets: Arc<RwLock<HashMap<String, SheetData>>>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with the given header row
    pub async fn create_sheet(&self, name: &str, headers: &[&str]) {
        let data = SheetData {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        };
        self.sheets.write().await.insert(name.to_string(), data);
    }

    /// Snapshot of a sheet's data rows (sheet rows 2..)
    pub async fn rows(&self, sheet: &str) -> Vec<Vec<CellValue>> {
        self.sheets
            .read()
            .await
            .get(sheet)
            .map(|s| s.rows.clone())
            .unwrap_or_default()
    }

    /// Ranges forced to plain-text format, in call order
    pub async fn plain_text_ranges(&self, sheet: &str) -> Vec<RowRange> {
        self.sheets
            .read()
            .await
            .get(sheet)
            .map(|s| s.plain_text_ranges.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn open(&self, _id: &str) -> Result<Box<dyn SpreadsheetHandle>> {
        Ok(Box::new(MemorySpreadsheet {
            sheets: self.sheets.clone(),
        }))
    }
}

struct MemorySpreadsheet {
    sheets: Arc<RwLock<HashMap<String, SheetData>>>,
}

#[async_trait]
impl SpreadsheetHandle for MemorySpreadsheet {
    async fn sheet(&self, name: &str) -> Result<Option<Box<dyn Sheet>>> {
        if !self.sheets.read().await.contains_key(name) {
            return Ok(None);
        }
        Ok(Some(Box::new(MemorySheet {
            sheets: self.sheets.clone(),
            name: name.to_string(),
        })))
    }
}

struct MemorySheet {
    sheets: Arc<RwLock<HashMap<String, SheetData>>>,
    name: String,
}

impl MemorySheet {
    async fn with<R>(&self, f: impl FnOnce(&SheetData) -> R) -> Result<R> {
        let sheets = self.sheets.read().await;
        let data = sheets
            .get(&self.name)
            .ok_or_else(|| Error::Store(format!("sheet {} vanished", self.name)))?;
        Ok(f(data))
    }
}

#[async_trait]
impl Sheet for MemorySheet {
    async fn header_row(&self) -> Result<Vec<String>> {
        self.with(|data| data.headers.clone()).await
    }

    async fn last_row_index(&self) -> Result<u32> {
        // Row 1 is the header row
        self.with(|data| 1 + data.rows.len() as u32).await
    }

    async fn set_plain_text_format(&self, range: RowRange) -> Result<()> {
        let mut sheets = self.sheets.write().await;
        let data = sheets
            .get_mut(&self.name)
            .ok_or_else(|| Error::StoreWrite(format!("sheet {} vanished", self.name)))?;
        data.plain_text_ranges.push(range);
        Ok(())
    }

    async fn write_row(&self, row: u32, values: &[CellValue]) -> Result<()> {
        if row < 2 {
            return Err(Error::StoreWrite(format!(
                "row {} would overwrite the header row",
                row
            )));
        }
        let mut sheets = self.sheets.write().await;
        let data = sheets
            .get_mut(&self.name)
            .ok_or_else(|| Error::StoreWrite(format!("sheet {} vanished", self.name)))?;

        let index = (row - 2) as usize;
        if index < data.rows.len() {
            return Err(Error::StoreWrite(format!("row {} is already populated", row)));
        }
        data.rows.resize(index, Vec::new());
        data.rows.push(values.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_sheet_resolves_to_none() {
        let store = MemorySheetStore::new();
        let doc = store.open("any").await.unwrap();
        assert!(doc.sheet("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn header_only_sheet_has_last_row_one() {
        let store = MemorySheetStore::new();
        store.create_sheet("Sheet1", &["name", "note"]).await;

        let doc = store.open("any").await.unwrap();
        let sheet = doc.sheet("Sheet1").await.unwrap().unwrap();

        assert_eq!(sheet.header_row().await.unwrap(), vec!["name", "note"]);
        assert_eq!(sheet.last_row_index().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn write_appends_and_advances_last_row() {
        let store = MemorySheetStore::new();
        store.create_sheet("Sheet1", &["name"]).await;

        let doc = store.open("any").await.unwrap();
        let sheet = doc.sheet("Sheet1").await.unwrap().unwrap();

        sheet.write_row(2, &[CellValue::from("a")]).await.unwrap();
        assert_eq!(sheet.last_row_index().await.unwrap(), 2);

        sheet.write_row(3, &[CellValue::from("b")]).await.unwrap();
        assert_eq!(sheet.last_row_index().await.unwrap(), 3);

        assert_eq!(
            store.rows("Sheet1").await,
            vec![vec![CellValue::from("a")], vec![CellValue::from("b")]]
        );
    }

    #[tokio::test]
    async fn rejects_header_and_duplicate_rows() {
        let store = MemorySheetStore::new();
        store.create_sheet("Sheet1", &["name"]).await;

        let doc = store.open("any").await.unwrap();
        let sheet = doc.sheet("Sheet1").await.unwrap().unwrap();

        assert!(sheet.write_row(1, &[CellValue::from("x")]).await.is_err());

        sheet.write_row(2, &[CellValue::from("a")]).await.unwrap();
        assert!(sheet.write_row(2, &[CellValue::from("b")]).await.is_err());
    }

    #[tokio::test]
    async fn records_plain_text_ranges() {
        let store = MemorySheetStore::new();
        store.create_sheet("Sheet1", &["name"]).await;

        let doc = store.open("any").await.unwrap();
        let sheet = doc.sheet("Sheet1").await.unwrap().unwrap();

        let range = RowRange { row: 2, width: 1 };
        sheet.set_plain_text_format(range).await.unwrap();
        assert_eq!(store.plain_text_ranges("Sheet1").await, vec![range]);
    }
}
