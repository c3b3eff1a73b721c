//! Sensor provider boundary for the MagChess board
//!
//! Everything between the magnetic sensors and the inference core lives here:
//! physical square coordinates, full-board raw snapshots, the latest-value
//! handoff shared between the acquisition task and the board tick task, the
//! persisted calibration table, and a simulated board for development
//! without hardware.
//!
//! # Module Organization
//!
//! - `coords` - Physical (file, rank) sensor coordinates
//! - `snapshot` - Raw readings, provider traits and the shared latest snapshot
//! - `calibration` - Baseline table persistence and the calibration sampler
//! - `simulated` - Noise-model sensor board used by the CLI and tests
//! - `acquisition` - Periodic sampling task publishing into [`SharedReadings`]

pub mod acquisition;
pub mod calibration;
pub mod coords;
pub mod error;
pub mod simulated;
pub mod snapshot;

pub use acquisition::run_acquisition;
pub use calibration::{CalibrationSampler, CalibrationTable};
pub use coords::{Coords, NUM_SQUARES};
pub use error::{SensorError, SensorResult};
pub use simulated::{SimulatedBoard, SimulatedSquare};
pub use snapshot::{ReadingSource, SensorProvider, SensorSnapshot, SharedReadings};
