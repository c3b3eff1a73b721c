//! Core module - Application infrastructure
//!
//! Everything the inference core needs before the first tick: the JSON
//! configuration file, the immutable [`SensorSettings`] derived from it, and
//! the tracing subscriber.
//!
//! # Startup Order
//!
//! 1. [`AppConfig::load`] resolves and reads the config file (defaults when absent)
//! 2. [`init_logging`] installs the subscriber at the configured level
//! 3. [`SensorSettings::load`] reads the calibration table; failure is fatal

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, BoardConfig, LoggingConfig, SensorConfig, SensorSettings};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
