//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level so a single run can be made
//! noisier without touching the config file.

use crate::core::error::{CoreError, CoreResult};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Fails if the directive does not parse or a subscriber is already set.
pub fn init_logging(level: &str) -> CoreResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| CoreError::Logging {
            message: format!("invalid level directive {:?}: {}", level, e),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| CoreError::Logging {
            message: e.to_string(),
        })
}
