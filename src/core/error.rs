//! Error types for core module
//!
//! Covers configuration persistence, calibration loading and logger setup.
//! All of these happen once at startup and are fatal to the caller.

use magchess_sensors::SensorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// Calibration table could not be loaded
    #[error("Calibration from {path:?} unusable: {source}")]
    Calibration {
        path: PathBuf,
        #[source]
        source: SensorError,
    },

    /// Invalid value in an otherwise well-formed config
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Tracing subscriber could not be installed
    #[error("Logging initialization failed: {message}")]
    Logging { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
