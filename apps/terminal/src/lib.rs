//! # Fizz Terminal Library
//!
//! The counter-side half of Fizz POS: state objects, the commands a UI
//! invokes, the checkout saga and the dashboard.
//!
//! ## Module Organization
//! ```text
//! fizz_terminal/
//! ├── lib.rs          ◄─── You are here (startup, Terminal container)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── Store configuration
//! ├── commands/
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── sale.rs     ◄─── Checkout and ledger commands
//! │   ├── dashboard.rs◄─── Sales reporting
//! │   └── config.rs   ◄─── Configuration retrieval
//! ├── reconcile.rs    ◄─── Post-sale stock writes with retry
//! ├── receipt.rs      ◄─── Receipt view model and text rendering
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! fizz_terminal::init_tracing();
//! let terminal = Terminal::from_env().await?;
//! let catalog = commands::product::list_products(&terminal.db).await?;
//! ```

pub mod commands;
pub mod error;
pub mod receipt;
pub mod reconcile;
pub mod state;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use directories::ProjectDirs;
use fizz_db::{Database, DbConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{CartState, ConfigState, DbState};

/// The three state objects a UI layer holds for one session.
#[derive(Debug, Clone)]
pub struct Terminal {
    pub db: DbState,
    pub cart: CartState,
    pub config: ConfigState,
}

impl Terminal {
    /// Connects to the database (running migrations) and starts with an
    /// empty cart.
    pub async fn open(db_config: DbConfig, config: ConfigState) -> Result<Self, ApiError> {
        let db = Database::new(db_config).await?;
        info!(store = %config.store_name, tax_rate_bps = config.tax_rate_bps, "Terminal ready");

        Ok(Terminal {
            db: DbState::new(db),
            cart: CartState::new(),
            config,
        })
    }

    /// Opens the terminal against the platform data directory, with
    /// configuration from `FIZZ_*` variables.
    pub async fn from_env() -> Result<Self, ApiError> {
        let db_path = default_database_path()?;
        info!(?db_path, "Database path determined");

        Self::open(DbConfig::new(db_path), ConfigState::from_env()).await
    }

    /// Throwaway terminal backed by an in-memory database.
    pub async fn in_memory() -> Result<Self, ApiError> {
        Self::open(DbConfig::in_memory(), ConfigState::default()).await
    }
}

/// Installs the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fizz=trace` - Show trace for fizz crates only
/// - Default: `info,fizz=debug,sqlx=warn`
///
/// Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fizz=debug,sqlx=warn"));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.fizz.pos/fizz.db`
/// - **Windows**: `%APPDATA%\fizz\pos\data\fizz.db`
/// - **Linux**: `~/.local/share/pos/fizz.db`
///
/// ## Development Override
/// Set `FIZZ_DB_PATH` to use a custom path.
pub fn default_database_path() -> Result<PathBuf, ApiError> {
    if let Ok(path) = std::env::var("FIZZ_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "fizz", "pos")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|e| {
        ApiError::internal(format!(
            "Could not create data directory {}: {}",
            data_dir.display(),
            e
        ))
    })?;

    Ok(data_dir.join("fizz.db"))
}
