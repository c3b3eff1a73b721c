//! Physical sensor coordinates
//!
//! A [`Coords`] names one sensor by its position on the board surface, not by
//! its chess square. Whether raw (file 0, rank 0) is `a1` or `h8` depends on
//! which way the board was set up; the inference core decides that once per
//! game and rotates coordinates with [`Coords::rotated`].

use crate::error::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sensors (one per square)
pub const NUM_SQUARES: usize = 64;

/// Sensor position (file 0-7, rank 0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coords {
    pub file: u8,
    pub rank: u8,
}

impl Coords {
    /// Create coordinates, rejecting anything off the board
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Coords { file, rank })
        } else {
            None
        }
    }

    /// Coordinates for a flat index (`rank * 8 + file`)
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < NUM_SQUARES {
            Some(Coords {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    /// Flat index in range 0..64, a1-style ordering
    #[inline]
    pub const fn index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    /// The same sensor seen from the other side of the board
    #[inline]
    pub const fn rotated(self) -> Self {
        Coords {
            file: 7 - self.file,
            rank: 7 - self.rank,
        }
    }

    /// All 64 coordinates in index order
    pub fn all() -> impl Iterator<Item = Coords> {
        (0..NUM_SQUARES).filter_map(Coords::from_index)
    }

    /// Parse a square name such as `"e4"`
    ///
    /// ```
    /// use magchess_sensors::Coords;
    /// let c = Coords::from_algebraic("e4").unwrap();
    /// assert_eq!((c.file, c.rank), (4, 3));
    /// ```
    pub fn from_algebraic(s: &str) -> SensorResult<Self> {
        let mut chars = s.trim().chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(SensorError::InvalidSquare(s.to_string()));
        };

        let file = match file_char.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(SensorError::InvalidSquare(s.to_string())),
        };
        let rank = match rank_char {
            c @ '1'..='8' => c as u8 - b'1',
            _ => return Err(SensorError::InvalidSquare(s.to_string())),
        };

        Ok(Coords { file, rank })
    }

    /// Square name assuming unrotated orientation (e.g. `"e4"`)
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }

    /// Key used in the calibration file: `"(file, rank)"`
    pub fn calibration_key(self) -> String {
        format!("({}, {})", self.file, self.rank)
    }

    /// Parse a calibration key; accepts `"(4, 3)"` and `"(4,3)"`
    pub fn parse_calibration_key(key: &str) -> SensorResult<Self> {
        let invalid = || SensorError::InvalidCalibrationKey {
            key: key.to_string(),
        };

        let inner = key
            .trim()
            .strip_prefix('(')
            .and_then(|k| k.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (file, rank) = inner.split_once(',').ok_or_else(invalid)?;
        let file: u8 = file.trim().parse().map_err(|_| invalid())?;
        let rank: u8 = rank.trim().parse().map_err(|_| invalid())?;

        Coords::new(file, rank).ok_or_else(invalid)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}
