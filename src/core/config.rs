//! Application configuration persistence
//!
//! Loads [`AppConfig`] from a JSON file and derives the immutable
//! [`SensorSettings`] that every cell is constructed from.
//!
//! # File Location
//!
//! Resolved in order:
//! 1. An explicit path (the `--config` flag)
//! 2. `magchess.json` in the platform config directory
//!    (e.g. `~/.config/magchess/magchess.json`)
//! 3. `magchess.json` in the working directory when no config directory exists
//!
//! # Error Handling
//!
//! A missing file is normal and yields defaults. A file that exists but does
//! not parse is an error: silently replacing a user's trigger delta with the
//! default would change classification behaviour behind their back.

use crate::core::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use magchess_sensors::CalibrationTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config filename
const CONFIG_FILENAME: &str = "magchess.json";

/// Default dead-zone half width around each baseline, in raw units
pub const DEFAULT_TRIGGER_DELTA: i64 = 500;

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sensors: SensorConfig,
    pub board: BoardConfig,
    pub logging: LoggingConfig,
}

/// Sensor acquisition and calibration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Persisted calibration table (`"(file, rank)" -> baseline`)
    pub calibration_file: PathBuf,
    /// Half width of the dead zone around each baseline
    pub trigger_delta: i64,
    /// Acquisition loop cadence
    pub acquisition_hz: u32,
    /// Uniform noise amplitude of the simulated board
    pub simulated_noise: i64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            calibration_file: PathBuf::from("sensor_calibration.json"),
            trigger_delta: DEFAULT_TRIGGER_DELTA,
            acquisition_hz: 60,
            simulated_noise: 100,
        }
    }
}

/// Board tick loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub tick_hz: u32,
    /// Set up the simulated board from black's side
    pub flipped_simulation: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            flipped_simulation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file
    ///
    /// Falls back to the working directory if the platform has no config dir.
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "magchess", "MagChess") {
            proj_dirs.config_dir().join(CONFIG_FILENAME)
        } else {
            PathBuf::from(CONFIG_FILENAME)
        }
    }

    /// Load from `explicit` or the default path
    ///
    /// Runs before logging is initialized, so the outcome is returned rather
    /// than only logged; [`AppConfig::log_summary`] reports it afterwards.
    pub fn load(explicit: Option<&Path>) -> CoreResult<(Self, PathBuf, bool)> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if !path.exists() {
            return Ok((Self::default(), path, false));
        }

        let contents = fs::read_to_string(&path)?;
        let config = Self::from_json_str(&contents)?;
        Ok((config, path, true))
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("[CONFIG] Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.sensors.trigger_delta <= 0 {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "sensors.trigger_delta must be positive, got {}",
                    self.sensors.trigger_delta
                ),
            });
        }
        if self.sensors.acquisition_hz == 0 || self.board.tick_hz == 0 {
            return Err(CoreError::InvalidConfig {
                message: "acquisition_hz and tick_hz must be non-zero".to_string(),
            });
        }
        if self.sensors.simulated_noise >= self.sensors.trigger_delta {
            warn!(
                "[CONFIG] simulated_noise {} reaches the trigger delta {}; simulated squares may flicker",
                self.sensors.simulated_noise, self.sensors.trigger_delta
            );
        }
        Ok(())
    }

    /// Log where the config came from (call once logging is up)
    pub fn log_summary(&self, path: &Path, found: bool) {
        if found {
            info!("[CONFIG] Loaded config from {:?}", path);
        } else {
            info!("[CONFIG] No config file at {:?}. Using defaults.", path);
        }
        info!(
            "[CONFIG] trigger_delta={} acquisition={}Hz tick={}Hz",
            self.sensors.trigger_delta, self.sensors.acquisition_hz, self.board.tick_hz
        );
    }
}

/// Immutable per-process sensor settings
///
/// Built once at startup and passed by reference into cell construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSettings {
    pub trigger_delta: i64,
    pub calibration: CalibrationTable,
}

impl SensorSettings {
    pub fn new(trigger_delta: i64, calibration: CalibrationTable) -> Self {
        Self {
            trigger_delta,
            calibration,
        }
    }

    /// Read the calibration table named in the config
    ///
    /// Any failure here (missing file, missing square, bad key) is fatal.
    pub fn load(config: &SensorConfig) -> CoreResult<Self> {
        let calibration = CalibrationTable::load(&config.calibration_file).map_err(|source| {
            CoreError::Calibration {
                path: config.calibration_file.clone(),
                source,
            }
        })?;
        Ok(Self::new(config.trigger_delta, calibration))
    }
}
