//! Serialization of the state tree to and from the durable store.
//!
//! Loading never fails: a missing, unreadable or corrupt value yields the
//! default tree, and a partially valid one keeps every slice that still
//! decodes.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::model::AppState;
use crate::storage::KeyValueStore;

/// Key the whole tree is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "blyx-state-v2";

/// How the persisted tree was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key.
    Fresh,
    /// Stored tree decoded in full (missing fields backfilled).
    Restored,
    /// Some slices failed to decode and were reset to defaults.
    Partial { dropped: Vec<&'static str> },
    /// Stored value was not a JSON object.
    Corrupt,
    /// The backend read failed.
    Unreadable,
}

pub fn encode_state(state: &AppState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Decode a raw persisted value, merging it over the default tree.
pub fn decode_state(raw: &str) -> (AppState, LoadOutcome) {
    let fields = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) | Err(_) => return (AppState::default(), LoadOutcome::Corrupt),
    };

    if let Ok(mut state) = serde_json::from_value::<AppState>(Value::Object(fields.clone())) {
        state.enforce_caps();
        return (state, LoadOutcome::Restored);
    }

    let mut state = AppState::default();
    let mut dropped = Vec::new();
    restore(&fields, "session", &mut state.session, &mut dropped);
    restore(&fields, "stats", &mut state.stats, &mut dropped);
    restore(&fields, "forest", &mut state.forest, &mut dropped);
    restore(&fields, "settings", &mut state.settings, &mut dropped);
    restore(&fields, "notes", &mut state.notes, &mut dropped);
    restore(&fields, "weather", &mut state.weather, &mut dropped);
    restore(&fields, "chat", &mut state.chat, &mut dropped);
    state.enforce_caps();

    (state, LoadOutcome::Partial { dropped })
}

fn restore<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    name: &'static str,
    target: &mut T,
    dropped: &mut Vec<&'static str>,
) {
    let Some(value) = fields.get(name) else {
        return;
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(slice) => *target = slice,
        Err(e) => {
            tracing::warn!(slice = name, error = %e, "discarding unreadable persisted slice");
            dropped.push(name);
        }
    }
}

/// Read the tree stored under `key`, falling back to defaults.
pub fn load_state(backend: &dyn KeyValueStore, key: &str) -> (AppState, LoadOutcome) {
    match backend.get(key) {
        Ok(Some(raw)) => {
            let (state, outcome) = decode_state(&raw);
            match &outcome {
                LoadOutcome::Corrupt => {
                    tracing::warn!(key, "persisted state is corrupt, using defaults")
                }
                LoadOutcome::Partial { dropped } => {
                    tracing::warn!(key, ?dropped, "persisted state partially restored")
                }
                _ => tracing::debug!(key, "persisted state restored"),
            }
            (state, outcome)
        }
        Ok(None) => (AppState::default(), LoadOutcome::Fresh),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted state, using defaults");
            (AppState::default(), LoadOutcome::Unreadable)
        }
    }
}
