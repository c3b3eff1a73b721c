//! Raw sensor snapshots and the latest-value handoff
//!
//! The acquisition task writes whole-board snapshots into [`SharedReadings`];
//! the board tick task copies out whatever is newest. Neither side waits for
//! the other: a tick that lands between two acquisition passes simply sees the
//! previous snapshot again.

use crate::coords::{Coords, NUM_SQUARES};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// One raw reading per square, indexed by [`Coords::index`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    values: [f64; NUM_SQUARES],
}

impl SensorSnapshot {
    /// Snapshot with every square reading `value`
    pub const fn uniform(value: f64) -> Self {
        Self {
            values: [value; NUM_SQUARES],
        }
    }

    pub fn from_values(values: [f64; NUM_SQUARES]) -> Self {
        Self { values }
    }

    #[inline]
    pub fn get(&self, coords: Coords) -> f64 {
        self.values[coords.index()]
    }

    #[inline]
    pub fn set(&mut self, coords: Coords, value: f64) {
        self.values[coords.index()] = value;
    }

    /// Iterate `(coords, value)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (Coords, f64)> + '_ {
        Coords::all().map(move |c| (c, self.values[c.index()]))
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

/// Produces full-board readings; driven by the acquisition loop
///
/// Hardware drivers (ADC + multiplexer) and [`crate::SimulatedBoard`] both sit
/// behind this trait.
pub trait ReadingSource: Send {
    /// Take one reading of every square
    fn sample(&mut self) -> SensorSnapshot;
}

impl<S: ReadingSource> ReadingSource for Arc<Mutex<S>> {
    fn sample(&mut self) -> SensorSnapshot {
        self.lock().sample()
    }
}

/// Read side of the sensor boundary: the latest raw value per square
pub trait SensorProvider {
    fn latest_reading(&self, coords: Coords) -> f64;

    /// Copy of all latest readings
    fn snapshot(&self) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::default();
        for coords in Coords::all() {
            snapshot.set(coords, self.latest_reading(coords));
        }
        snapshot
    }
}

impl SensorProvider for SensorSnapshot {
    fn latest_reading(&self, coords: Coords) -> f64 {
        self.get(coords)
    }

    fn snapshot(&self) -> SensorSnapshot {
        *self
    }
}

/// Latest-value snapshot shared between the acquisition and tick tasks
///
/// Cloning shares the same underlying snapshot. The lock is only ever held
/// for the duration of a 64-value copy.
#[derive(Debug, Clone, Default)]
pub struct SharedReadings {
    inner: Arc<RwLock<SharedState>>,
}

#[derive(Debug, Default)]
struct SharedState {
    snapshot: SensorSnapshot,
    generation: u64,
}

impl SharedReadings {
    pub fn new(initial: SensorSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SharedState {
                snapshot: initial,
                generation: 0,
            })),
        }
    }

    /// Replace the current snapshot with a newer one
    pub fn publish(&self, snapshot: SensorSnapshot) {
        let mut state = self.inner.write();
        state.snapshot = snapshot;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Number of snapshots published so far
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }
}

impl SensorProvider for SharedReadings {
    fn latest_reading(&self, coords: Coords) -> f64 {
        self.inner.read().snapshot.get(coords)
    }

    fn snapshot(&self) -> SensorSnapshot {
        self.inner.read().snapshot
    }
}
