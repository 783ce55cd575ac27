mod config;
pub mod database;
mod store;

pub use config::Config;
pub use database::{Database, SubmissionRecord};
pub use store::{DbSessionStore, MemoryStore, PersistedSession, SessionStore};

use std::path::PathBuf;

/// Returns `~/.config/arquetipo[-dev]/` based on ARQUETIPO_ENV.
///
/// Set ARQUETIPO_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ARQUETIPO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("arquetipo-dev")
    } else {
        base_dir.join("arquetipo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
