//! Sensor calibration table and sampler
//!
//! Each hall sensor idles at a slightly different value, so classification is
//! done relative to a per-square baseline measured with the board empty. The
//! baselines are persisted as JSON keyed by `"(file, rank)"`:
//!
//! ```json
//! {
//!     "(0, 0)": 32750,
//!     "(0, 1)": 32711,
//!     ...
//! }
//! ```
//!
//! A table is only usable when all 64 squares are present; a gap is a fatal
//! configuration error rather than something to guess around.

use crate::coords::{Coords, NUM_SQUARES};
use crate::error::{SensorError, SensorResult};
use crate::snapshot::SensorSnapshot;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Baseline reading per square
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTable {
    baselines: [i64; NUM_SQUARES],
}

impl CalibrationTable {
    /// Table with the same baseline on every square
    pub const fn uniform(baseline: i64) -> Self {
        Self {
            baselines: [baseline; NUM_SQUARES],
        }
    }

    /// Build from a coordinate map; every square must be present
    pub fn from_map(map: &BTreeMap<Coords, i64>) -> SensorResult<Self> {
        let mut baselines = [0; NUM_SQUARES];
        for coords in Coords::all() {
            let value = map
                .get(&coords)
                .ok_or(SensorError::CalibrationMissing { coords })?;
            baselines[coords.index()] = *value;
        }
        Ok(Self { baselines })
    }

    /// Parse the persisted JSON form
    pub fn from_json_str(json: &str) -> SensorResult<Self> {
        let raw: BTreeMap<String, i64> = serde_json::from_str(json)?;
        let mut map = BTreeMap::new();
        for (key, value) in raw {
            map.insert(Coords::parse_calibration_key(&key)?, value);
        }
        Self::from_map(&map)
    }

    /// Load a calibration file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> SensorResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents)?;
        info!("[CALIBRATION] Loaded baselines for {} squares from {:?}", NUM_SQUARES, path);
        Ok(table)
    }

    /// Serialize to the persisted JSON form (sorted keys, pretty printed)
    pub fn to_json_string(&self) -> SensorResult<String> {
        let map: BTreeMap<String, i64> = Coords::all()
            .map(|c| (c.calibration_key(), self.baselines[c.index()]))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }

    /// Write the table to disk, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SensorResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_string()?)?;
        info!("[CALIBRATION] Written {:?}", path);
        Ok(())
    }

    #[inline]
    pub fn baseline(&self, coords: Coords) -> i64 {
        self.baselines[coords.index()]
    }

    pub fn set_baseline(&mut self, coords: Coords, value: i64) {
        self.baselines[coords.index()] = value;
    }
}

/// Collects full-board samples and averages them into a [`CalibrationTable`]
///
/// Also times the arrivals so the operator can see the achieved sample rate.
#[derive(Debug)]
pub struct CalibrationSampler {
    target: usize,
    sums: [f64; NUM_SQUARES],
    count: usize,
    last_arrival: Option<Instant>,
    intervals: Vec<f64>,
}

impl CalibrationSampler {
    pub fn new(target: usize) -> Self {
        Self {
            target: target.max(1),
            sums: [0.0; NUM_SQUARES],
            count: 0,
            last_arrival: None,
            intervals: Vec::new(),
        }
    }

    /// Record one snapshot; returns `true` once the target count is reached
    pub fn push(&mut self, snapshot: &SensorSnapshot, arrived_at: Instant) -> bool {
        for (coords, value) in snapshot.iter() {
            self.sums[coords.index()] += value;
        }
        self.count += 1;

        if let Some(last) = self.last_arrival {
            self.intervals
                .push(arrived_at.saturating_duration_since(last).as_secs_f64());
        }
        self.last_arrival = Some(arrived_at);

        debug!("[CALIBRATION] Sampled {}/{}", self.count, self.target);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.target
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Floor of the per-square mean over all collected samples
    pub fn average(&self) -> SensorResult<CalibrationTable> {
        if self.count == 0 {
            return Err(SensorError::NoSamples);
        }
        let mut table = CalibrationTable::uniform(0);
        for coords in Coords::all() {
            let mean = self.sums[coords.index()] / self.count as f64;
            table.set_baseline(coords, mean.floor() as i64);
        }
        Ok(table)
    }

    /// Achieved samples per second, once at least two samples arrived
    pub fn samples_per_second(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            return None;
        }
        let mean = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
        if mean > 0.0 {
            Some(1.0 / mean)
        } else {
            None
        }
    }
}
