mod config;
pub mod kv;

pub use config::{ChatConfig, Config, SessionConfig, StorageConfig, WeatherConfig};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/blyx[-dev]/` based on BLYX_ENV.
///
/// Set BLYX_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BLYX_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("blyx-dev")
    } else {
        base_dir.join("blyx")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
