mod config;
pub mod document;
pub mod persist;
mod settings;
pub mod store;
pub mod transfer;

pub use config::{Config, LoggingConfig, StorageConfig, SyncConfig};
pub use document::{
    NewProject, NewSession, NewTimeEntry, Project, SessionRecord, TimeDocument, TimeEntry,
    SCHEMA_VERSION, UNKNOWN_PROJECT,
};
pub use persist::{JsonFilePersist, MemoryPersist, Persist};
pub use settings::Settings;
pub use store::TimeStore;
pub use transfer::{DocumentDialog, FilePathDialog};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/goodtimer[-dev]/` based on GOODTIMER_ENV.
///
/// Set GOODTIMER_ENV=dev to use development data directory.
/// Set GOODTIMER_HOME to use an explicit directory instead.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("GOODTIMER_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("GOODTIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("goodtimer-dev")
            } else {
                base_dir.join("goodtimer")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
