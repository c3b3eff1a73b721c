//! Error types for the sensor layer

use crate::coords::Coords;

/// Errors raised while loading calibration data or sampling sensors
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// A square has no baseline value; the square cannot be classified
    #[error("Calibration missing for square {coords}")]
    CalibrationMissing { coords: Coords },

    /// A calibration key could not be read as "(file, rank)"
    #[error("Invalid calibration key: {key}")]
    InvalidCalibrationKey { key: String },

    /// Text could not be read as a square name
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// Calibration file I/O error
    #[error("Calibration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Calibration serialization/deserialization error
    #[error("Calibration serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Averaging was requested before any sample arrived
    #[error("No sensor samples collected")]
    NoSamples,
}

/// Result type alias for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;
