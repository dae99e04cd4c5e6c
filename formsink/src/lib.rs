//! formsink library - HTTP form-to-spreadsheet submission gateway
//!
//! Accepts form submissions over HTTP and appends each as a row to a bound
//! spreadsheet, serializing all writers through one process-wide lock,
//! filtering honeypot traffic and neutralizing spreadsheet formula
//! injection on the way in.

use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod lock;
pub mod notify;
pub mod outcome;
pub mod row;
pub mod sanitize;
pub mod store;
pub mod submission;

pub use coordinator::SubmissionCoordinator;
pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SubmissionCoordinator>,
}

impl AppState {
    /// Create new application state
    pub fn new(coordinator: SubmissionCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(api::submit))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
