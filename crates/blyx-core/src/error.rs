//! Core error types for blyx-core.
//!
//! Store mutations never surface these to callers; they are logged and
//! swallowed at the mutation boundary. The enums below cover the fallible
//! edges: the durable key-value store, configuration, weather lookups and
//! the calculator.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for blyx-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable key-value store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Weather lookup errors
    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    /// Calculator errors
    #[error("Calculator error: {0}")]
    Calc(#[from] CalcError),
}

/// Durable key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Backend rejected the write
    #[error("Write rejected for key '{key}': {message}")]
    WriteRejected { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be prepared
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Weather lookup errors.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Geocoding returned no match
    #[error("Location not found")]
    LocationNotFound,

    /// Forecast response carried no current conditions
    #[error("Weather unavailable")]
    Unavailable,

    /// Transport or HTTP status failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Calculator errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Unexpected character or token
    #[error("Unexpected token at position {position}")]
    UnexpectedToken { position: usize },

    /// Input ended mid-expression
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// Malformed number literal
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    /// Divisor evaluated to zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Result is infinite or NaN
    #[error("Result is not a finite number")]
    NotFinite,
}

/// Boxed error returned by store listeners.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
