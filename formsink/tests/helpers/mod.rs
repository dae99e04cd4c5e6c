//! Shared fixtures for formsink integration tests

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tokio::sync::Mutex;

use formsink::db;
use formsink::lock::SubmitLock;
use formsink::notify::{NotificationChannel, Notifier};
use formsink::store::{SheetStore, MemorySheetStore, SpreadsheetHandle};
use formsink::{build_router, AppState, Error, Result, SubmissionCoordinator};

pub const TEST_SPREADSHEET_ID: &str = "test-spreadsheet";
pub const TEST_RECIPIENT: &str = "ops@example.com";
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// One captured notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Notification channel that records instead of sending
#[derive(Default, Clone)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingChannel {
    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    /// Wait until at least `count` notifications have been recorded;
    /// notification dispatch is detached from the response path
    pub async fn wait_for(&self, count: usize) -> Vec<SentMail> {
        for _ in 0..100 {
            let sent = self.sent().await;
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Timed out waiting for {} notification(s)", count);
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        self.sent.lock().await.push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Store whose backing service is unreachable
pub struct UnreachableStore;

#[async_trait]
impl SheetStore for UnreachableStore {
    async fn open(&self, _id: &str) -> Result<Box<dyn SpreadsheetHandle>> {
        Err(Error::Store("Bridge unreachable: connection refused".to_string()))
    }
}

/// Fully wired test application over shared fakes
pub struct TestContext {
    pub app: Router,
    pub store: MemorySheetStore,
    pub lock: SubmitLock,
    pub mail: RecordingChannel,
}

/// In-memory settings database, already bound to [`TEST_SPREADSHEET_ID`]
pub async fn settings_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Should connect to in-memory database");
    db::init(&pool).await.expect("Should initialize settings");
    db::settings::bind_spreadsheet(&pool, TEST_SPREADSHEET_ID)
        .await
        .expect("Should bind test spreadsheet");
    pool
}

/// Context with the default sheet (`Sheet1`: id, timestamp, name, note)
pub async fn context() -> TestContext {
    context_with_timeout(DEFAULT_LOCK_TIMEOUT).await
}

pub async fn context_with_timeout(lock_timeout: Duration) -> TestContext {
    let store = MemorySheetStore::new();
    store
        .create_sheet("Sheet1", &["id", "timestamp", "name", "note"])
        .await;
    context_over(store, lock_timeout, true).await
}

/// Context over an arbitrary memory store; `bound` controls whether the
/// settings database carries a spreadsheet binding
pub async fn context_over(
    store: MemorySheetStore,
    lock_timeout: Duration,
    bound: bool,
) -> TestContext {
    let pool = if bound {
        settings_db().await
    } else {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Should connect to in-memory database");
        db::init(&pool).await.expect("Should initialize settings");
        pool
    };

    let lock = SubmitLock::new();
    let mail = RecordingChannel::default();
    let notifier = Notifier::new(Arc::new(mail.clone()), TEST_RECIPIENT);
    let coordinator = SubmissionCoordinator::new(
        pool,
        Arc::new(store.clone()),
        lock.clone(),
        notifier,
        lock_timeout,
    );

    TestContext {
        app: build_router(AppState::new(coordinator)),
        store,
        lock,
        mail,
    }
}

/// Context whose store collaborator always fails
pub async fn context_with_unreachable_store() -> TestContext {
    let pool = settings_db().await;
    let lock = SubmitLock::new();
    let mail = RecordingChannel::default();
    let notifier = Notifier::new(Arc::new(mail.clone()), TEST_RECIPIENT);
    let coordinator = SubmissionCoordinator::new(
        pool,
        Arc::new(UnreachableStore),
        lock.clone(),
        notifier,
        DEFAULT_LOCK_TIMEOUT,
    );

    TestContext {
        app: build_router(AppState::new(coordinator)),
        store: MemorySheetStore::new(),
        lock,
        mail,
    }
}

/// POST / with a URL-encoded form body
pub fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract the JSON body from a response
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
