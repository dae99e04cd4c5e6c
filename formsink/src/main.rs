//! formsink - HTTP form-to-spreadsheet submission gateway
//!
//! Receives form submissions, serializes them through a process-wide lock
//! and appends each as a row to the bound spreadsheet via the sheets
//! bridge. Run `bind-store` once to bind the gateway to a spreadsheet
//! before accepting traffic.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use formsink::config::{Args, Config};
use formsink::db;
use formsink::lock::SubmitLock;
use formsink::notify::Notifier;
use formsink::store::RestSheetStore;
use formsink::{build_router, AppState, SubmissionCoordinator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting formsink v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(&args)?;
    config.ensure_root_folder()?;

    let db_path = config.database_path();
    info!("Settings database: {}", db_path.display());

    let pool = db::connect(&db_path).await?;
    db::init(&pool).await?;

    match db::settings::spreadsheet_binding(&pool).await? {
        Some(id) => info!("✓ Bound to spreadsheet {}", id),
        None => warn!("No spreadsheet bound - submissions will fail until bind-store is run"),
    }

    let store = Arc::new(RestSheetStore::new(config.store.clone())?);
    info!("Sheets bridge: {}", config.store.bridge_url);

    let notifier = Notifier::from_config(&config.notify)?;
    match &config.notify.recipient {
        Some(recipient) => info!("✓ Notifying {} of submissions", recipient),
        None => info!("Submission notification disabled (no recipient configured)"),
    }

    let coordinator = SubmissionCoordinator::new(
        pool,
        store,
        SubmitLock::new(),
        notifier,
        config.lock_timeout,
    );
    let app = build_router(AppState::new(coordinator));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| formsink::Error::Http(format!("Failed to bind to {}: {}", config.bind, e)))?;
    info!("formsink listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| formsink::Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
