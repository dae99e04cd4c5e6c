//! Configuration resolution
//!
//! Settings resolve in priority order: command line > environment (via
//! clap's env support) > TOML config file in the root folder > compiled
//! default. The root folder holds both the settings database
//! (`formsink.db`) and the optional config file (`formsink.toml`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::store::rest::StoreConfig;

/// Bounded wait for the exclusive submission lock
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 10_000;

const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5780);
const CONFIG_FILE: &str = "formsink.toml";
const DATABASE_FILE: &str = "formsink.db";
const DEFAULT_SENDER: &str = "formsink";

/// Command-line arguments for the gateway service
#[derive(Parser, Debug, Default)]
#[command(name = "formsink", about = "HTTP form-to-spreadsheet submission gateway", version)]
pub struct Args {
    /// Root folder holding the settings database and config file
    #[arg(long, env = "FORMSINK_ROOT")]
    pub root_folder: Option<PathBuf>,

    /// Socket address to listen on
    #[arg(long, env = "FORMSINK_BIND")]
    pub bind: Option<SocketAddr>,

    /// Base URL of the sheets-bridge service
    #[arg(long, env = "FORMSINK_BRIDGE_URL")]
    pub bridge_url: Option<String>,
}

/// Optional `formsink.toml` contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<SocketAddr>,
    pub lock_timeout_ms: Option<u64>,
    #[serde(default)]
    pub store: StoreToml,
    #[serde(default)]
    pub notify: NotifyToml,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreToml {
    pub bridge_url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyToml {
    pub mail_url: Option<String>,
    pub api_token: Option<String>,
    pub recipient: Option<String>,
    pub sender: Option<String>,
}

/// Notification channel settings
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub mail_url: Option<String>,
    pub api_token: Option<String>,
    pub recipient: Option<String>,
    pub sender: String,
}

/// Resolved gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: PathBuf,
    pub bind: SocketAddr,
    pub lock_timeout: Duration,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
}

impl Config {
    /// Resolve configuration from arguments, the TOML file and defaults
    pub fn load(args: &Args) -> Result<Self> {
        let root_folder = resolve_root_folder(args.root_folder.as_deref());
        let toml_config = load_toml(&root_folder.join(CONFIG_FILE))?;

        let bridge_url = args
            .bridge_url
            .clone()
            .or_else(|| toml_config.store.bridge_url.clone())
            .ok_or_else(|| {
                Error::Config(
                    "Sheets bridge URL not configured. Configure using one of:\n\
                     1. Command line: --bridge-url http://localhost:9000\n\
                     2. Environment: FORMSINK_BRIDGE_URL=http://localhost:9000\n\
                     3. TOML config: formsink.toml ([store] bridge_url = \"...\")"
                        .to_string(),
                )
            })?;

        let bind = args.bind.or(toml_config.bind).unwrap_or(DEFAULT_BIND);
        let lock_timeout = Duration::from_millis(
            toml_config.lock_timeout_ms.unwrap_or(DEFAULT_LOCK_TIMEOUT_MS),
        );

        Ok(Config {
            root_folder,
            bind,
            lock_timeout,
            store: StoreConfig {
                bridge_url,
                api_token: toml_config.store.api_token,
            },
            notify: NotifyConfig {
                mail_url: toml_config.notify.mail_url,
                api_token: toml_config.notify.api_token,
                recipient: toml_config.notify.recipient,
                sender: toml_config
                    .notify
                    .sender
                    .unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            },
        })
    }

    pub fn database_path(&self) -> PathBuf {
        settings_database_path(&self.root_folder)
    }

    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

/// Location of the settings database within a root folder
pub fn settings_database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Root folder from the CLI/environment, falling back to the platform's
/// local data directory
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    match cli_arg {
        Some(path) => path.to_path_buf(),
        None => dirs::data_local_dir()
            .map(|d| d.join("formsink"))
            .unwrap_or_else(|| PathBuf::from("./formsink_data")),
    }
}

fn load_toml(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
