//! bind-store - one-time administrative binding
//!
//! Binds the formsink gateway to a specific backing spreadsheet by writing
//! its identifier into the settings database. The gateway reads the
//! binding on every submission, so re-running this tool retargets a
//! running gateway without a restart.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use formsink::config::{resolve_root_folder, settings_database_path};
use formsink::db;

#[derive(Parser, Debug)]
#[command(name = "bind-store", about = "Bind formsink to a backing spreadsheet", version)]
struct Args {
    /// Root folder holding the settings database
    #[arg(long, env = "FORMSINK_ROOT")]
    root_folder: Option<PathBuf>,

    /// Identifier of the spreadsheet to bind
    spreadsheet_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    std::fs::create_dir_all(&root_folder)?;

    let db_path = settings_database_path(&root_folder);
    let pool = db::connect(&db_path).await?;
    db::init(&pool).await?;

    db::settings::bind_spreadsheet(&pool, &args.spreadsheet_id).await?;
    info!(
        "✓ Bound gateway to spreadsheet {} ({})",
        args.spreadsheet_id,
        db_path.display()
    );

    Ok(())
}
