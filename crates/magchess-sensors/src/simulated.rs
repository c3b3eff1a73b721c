//! Simulated sensor board
//!
//! Stands in for the ADC/multiplexer hardware during development. Each square
//! holds a simulated magnet state and produces readings around its calibration
//! baseline:
//!
//! | State   | Reading                          |
//! |---------|----------------------------------|
//! | `Empty` | `baseline + noise`               |
//! | `White` | `baseline - 2 * delta + noise`   |
//! | `Black` | `baseline + 2 * delta + noise`   |
//!
//! Noise is uniform in `-noise..=noise`. With `noise < delta` every reading
//! lands on the intended side of the dead zone.

use crate::calibration::CalibrationTable;
use crate::coords::{Coords, NUM_SQUARES};
use crate::snapshot::{ReadingSource, SensorSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulated magnet state of one square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulatedSquare {
    #[default]
    Empty,
    White,
    Black,
}

impl SimulatedSquare {
    /// Next state in the click cycle: Empty → White → Black → Empty
    pub fn cycled(self) -> Self {
        match self {
            SimulatedSquare::Empty => SimulatedSquare::White,
            SimulatedSquare::White => SimulatedSquare::Black,
            SimulatedSquare::Black => SimulatedSquare::Empty,
        }
    }
}

/// Noise-model sensor board
#[derive(Debug)]
pub struct SimulatedBoard {
    calibration: CalibrationTable,
    trigger_delta: i64,
    noise: i64,
    squares: [SimulatedSquare; NUM_SQUARES],
    rng: StdRng,
}

impl SimulatedBoard {
    /// Empty board seeded from the OS
    pub fn new(calibration: CalibrationTable, trigger_delta: i64, noise: i64) -> Self {
        Self::with_rng(calibration, trigger_delta, noise, StdRng::from_os_rng())
    }

    /// Empty board with a fixed seed, for reproducible runs
    pub fn seeded(calibration: CalibrationTable, trigger_delta: i64, noise: i64, seed: u64) -> Self {
        Self::with_rng(calibration, trigger_delta, noise, StdRng::seed_from_u64(seed))
    }

    fn with_rng(calibration: CalibrationTable, trigger_delta: i64, noise: i64, rng: StdRng) -> Self {
        Self {
            calibration,
            trigger_delta,
            noise: noise.saturating_abs(),
            squares: [SimulatedSquare::Empty; NUM_SQUARES],
            rng,
        }
    }

    /// Place the 32 pieces of a starting setup
    ///
    /// Unflipped puts white on raw ranks 0-1; flipped puts black there.
    pub fn set_starting_layout(&mut self, flipped: bool) {
        let (near, far) = if flipped {
            (SimulatedSquare::Black, SimulatedSquare::White)
        } else {
            (SimulatedSquare::White, SimulatedSquare::Black)
        };
        for coords in Coords::all() {
            self.squares[coords.index()] = match coords.rank {
                0 | 1 => near,
                6 | 7 => far,
                _ => SimulatedSquare::Empty,
            };
        }
    }

    /// Remove every piece
    pub fn clear(&mut self) {
        self.squares = [SimulatedSquare::Empty; NUM_SQUARES];
    }

    pub fn get(&self, coords: Coords) -> SimulatedSquare {
        self.squares[coords.index()]
    }

    pub fn set(&mut self, coords: Coords, state: SimulatedSquare) {
        self.squares[coords.index()] = state;
    }

    /// Lift whatever is on the square
    pub fn lift(&mut self, coords: Coords) {
        self.set(coords, SimulatedSquare::Empty);
    }

    /// Advance the square through the click cycle
    pub fn cycle(&mut self, coords: Coords) -> SimulatedSquare {
        let next = self.get(coords).cycled();
        self.set(coords, next);
        next
    }

    fn reading(&mut self, coords: Coords) -> f64 {
        let baseline = self.calibration.baseline(coords);
        let offset = match self.get(coords) {
            SimulatedSquare::Empty => 0,
            SimulatedSquare::White => self.trigger_delta.saturating_mul(-2),
            SimulatedSquare::Black => self.trigger_delta.saturating_mul(2),
        };
        let noise = self.rng.random_range(-self.noise..=self.noise);
        baseline.saturating_add(offset).saturating_add(noise) as f64
    }
}

impl ReadingSource for SimulatedBoard {
    fn sample(&mut self) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::default();
        for coords in Coords::all() {
            let value = self.reading(coords);
            snapshot.set(coords, value);
        }
        snapshot
    }
}
