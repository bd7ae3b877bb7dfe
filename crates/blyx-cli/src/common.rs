//! Shared plumbing for the one-shot commands.

use blyx_core::{Config, SqliteKv, Store};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the durable store named by the config. Load fallbacks are logged by
/// the store and never fatal here.
pub fn open_store(config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    let kv = SqliteKv::open(&config.storage.database)?;
    let (store, outcome) = Store::open(Box::new(kv), config.storage.key.clone());
    tracing::debug!(?outcome, key = %config.storage.key, "store opened");
    Ok(store)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
