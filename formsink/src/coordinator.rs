//! Submission coordinator
//!
//! Orchestrates one submission end to end: acquire the process-wide lock,
//! short-circuit honeypot traffic, resolve the bound spreadsheet and target
//! sheet, derive the row from the current headers, write it at the next
//! free position, and report the outcome. Every collaborator is injected at
//! construction so the pipeline runs unchanged against fake stores and
//! channels in tests.
//!
//! The store has no transactions: the header read, the row-position
//! computation and the write all happen under the one lock, which is the
//! only thing keeping concurrent submissions from claiming the same row.

use std::sync::Arc;
use std::time::Duration;

use sqlx::{Pool, Sqlite};
use tracing::{error, info};

use crate::db;
use crate::error::{Error, Result};
use crate::lock::SubmitLock;
use crate::notify::Notifier;
use crate::outcome::Outcome;
use crate::row::build_row;
use crate::store::{RowRange, SheetStore};
use crate::submission::Submission;

/// Orchestrates the submission pipeline with injected collaborators
pub struct SubmissionCoordinator {
    settings: Pool<Sqlite>,
    store: Arc<dyn SheetStore>,
    lock: SubmitLock,
    notifier: Notifier,
    lock_timeout: Duration,
}

impl SubmissionCoordinator {
    pub fn new(
        settings: Pool<Sqlite>,
        store: Arc<dyn SheetStore>,
        lock: SubmitLock,
        notifier: Notifier,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            store,
            lock,
            notifier,
            lock_timeout,
        }
    }

    /// Handle one submission, always producing a structured outcome.
    ///
    /// The lock guard is released on every path out of this function,
    /// including append failures; a deadlocked gateway would stall every
    /// subsequent submission, so nothing here is allowed to escape with the
    /// guard still held.
    pub async fn handle(&self, submission: Submission) -> Outcome {
        let _guard = match self.lock.acquire(self.lock_timeout).await {
            Ok(guard) => guard,
            Err(e) => {
                error!("Submission rejected: {}", e);
                let outcome = Outcome::error(e.to_string());
                self.notifier.notify(&outcome);
                return outcome;
            }
        };

        // Honeypot traffic gets a success-shaped response and touches
        // neither the store nor the notifier
        if submission.is_bot() {
            info!("Honeypot field set, discarding submission");
            return Outcome::bot_detected();
        }

        let outcome = match self.append(&submission).await {
            Ok(row) => {
                info!(row, sheet = submission.sheet_name(), "Submission appended");
                Outcome::success(row)
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                Outcome::error(e.to_string())
            }
        };

        self.notifier.notify(&outcome);
        outcome
    }

    /// Append the submission to its target sheet, returning the assigned
    /// row position. Caller must hold the submission lock.
    async fn append(&self, submission: &Submission) -> Result<u32> {
        let spreadsheet_id = db::settings::spreadsheet_binding(&self.settings)
            .await?
            .ok_or_else(|| {
                Error::Config(
                    "No spreadsheet bound; run bind-store to bind this gateway".to_string(),
                )
            })?;

        let doc = self.store.open(&spreadsheet_id).await?;

        let sheet_name = submission.sheet_name();
        let sheet = doc
            .sheet(sheet_name)
            .await?
            .ok_or_else(|| Error::SheetNotFound(sheet_name.to_string()))?;

        // Headers are re-read on every request; the column layout may have
        // changed since the last submission
        let headers = sheet.header_row().await?;
        let next_row = sheet.last_row_index().await? + 1;

        let row = build_row(&headers, submission);

        // Force plain text before writing so the store never evaluates the
        // values, then write the sanitized row
        let range = RowRange {
            row: next_row,
            width: row.len() as u32,
        };
        sheet.set_plain_text_format(range).await?;
        sheet.write_row(next_row, &row).await?;

        Ok(next_row)
    }
}
