//! Per-square signal classification
//!
//! A hall sensor idles near its calibrated baseline. A magnet pushes the
//! reading down (white pieces) or up (black pieces). A fixed dead zone of
//! `baseline ± trigger_delta` absorbs noise:
//!
//! ```text
//!   White        Empty        Black
//! ─────────┤ ─────────────── ├─────────
//!        low   baseline    high
//! ```
//!
//! There is no temporal smoothing: a cell's color is always the pure function
//! [`classify`] of its latest reading.

use crate::core::SensorSettings;
use crate::game::layout::PieceLayout;
use crate::game::types::{coords_of, square_at};
use magchess_sensors::{Coords, SensorProvider, NUM_SQUARES};
use shakmaty::{Color, Square};
use std::fmt;

/// Classify one raw reading against its baseline
///
/// Below `reference - delta` is white, above `reference + delta` is black,
/// anything else (including NaN) is empty.
#[inline]
pub fn classify(raw: f64, reference: i64, delta: i64) -> Option<Color> {
    let low = reference.saturating_sub(delta) as f64;
    let high = reference.saturating_add(delta) as f64;
    if raw < low {
        Some(Color::White)
    } else if raw > high {
        Some(Color::Black)
    } else {
        None
    }
}

/// Display symbol for a detected color
pub const fn color_symbol(color: Option<Color>) -> char {
    match color {
        Some(Color::White) => 'W',
        Some(Color::Black) => 'B',
        None => '.',
    }
}

/// One square's sensor and its thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    coords: Coords,
    reference_value: i64,
    trigger_delta: i64,
    raw_value: f64,
    detected_color: Option<Color>,
}

impl Cell {
    pub fn new(coords: Coords, settings: &SensorSettings) -> Self {
        let reference_value = settings.calibration.baseline(coords);
        Self {
            coords,
            reference_value,
            trigger_delta: settings.trigger_delta,
            raw_value: reference_value as f64,
            detected_color: None,
        }
    }

    /// Feed the latest raw reading
    pub fn update(&mut self, raw_value: f64) {
        self.raw_value = raw_value;
        self.detected_color = classify(raw_value, self.reference_value, self.trigger_delta);
    }

    #[inline]
    pub fn detected_color(&self) -> Option<Color> {
        self.detected_color
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn reference_value(&self) -> i64 {
        self.reference_value
    }

    pub fn threshold_low(&self) -> i64 {
        self.reference_value.saturating_sub(self.trigger_delta)
    }

    pub fn threshold_high(&self) -> i64 {
        self.reference_value.saturating_add(self.trigger_delta)
    }

    pub fn raw_value(&self) -> f64 {
        self.raw_value
    }

    pub fn symbol(&self) -> char {
        color_symbol(self.detected_color)
    }
}

/// All 64 cells, indexed by [`Coords::index`]
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(settings: &SensorSettings) -> Self {
        Self {
            cells: Coords::all().map(|c| Cell::new(c, settings)).collect(),
        }
    }

    /// Update every cell from the provider's latest readings
    pub fn update_from<P: SensorProvider + ?Sized>(&mut self, provider: &P) -> SensorFrame {
        let snapshot = provider.snapshot();
        for cell in &mut self.cells {
            cell.update(snapshot.get(cell.coords));
        }
        self.frame()
    }

    /// Current detected colors as a frame
    pub fn frame(&self) -> SensorFrame {
        let mut frame = SensorFrame::empty();
        for cell in &self.cells {
            frame.set(cell.coords, cell.detected_color);
        }
        frame
    }

    pub fn cell(&self, coords: Coords) -> &Cell {
        &self.cells[coords.index()]
    }
}

/// Detected color of every sensor, in raw (unrotated) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorFrame {
    colors: [Option<Color>; NUM_SQUARES],
}

impl SensorFrame {
    pub const fn empty() -> Self {
        Self {
            colors: [None; NUM_SQUARES],
        }
    }

    /// Frame a board holding exactly `layout` would produce
    pub fn from_layout(layout: &PieceLayout, flipped: bool) -> Self {
        let mut frame = Self::empty();
        for (square, piece) in layout.iter() {
            frame.set(coords_of(square, flipped), Some(piece.color));
        }
        frame
    }

    #[inline]
    pub fn get(&self, coords: Coords) -> Option<Color> {
        self.colors[coords.index()]
    }

    #[inline]
    pub fn set(&mut self, coords: Coords, color: Option<Color>) {
        self.colors[coords.index()] = color;
    }

    /// Detected color under a chess square for the given orientation
    pub fn color_on(&self, square: Square, flipped: bool) -> Option<Color> {
        self.get(coords_of(square, flipped))
    }

    /// Set the color under a chess square for the given orientation
    pub fn set_on(&mut self, square: Square, flipped: bool, color: Option<Color>) {
        self.set(coords_of(square, flipped), color);
    }

    /// Iterate `(raw coords, logical square, detected color)`
    pub fn squares(&self, flipped: bool) -> impl Iterator<Item = (Coords, Square, Option<Color>)> + '_ {
        Coords::all().map(move |c| (c, square_at(c, flipped), self.get(c)))
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut symbols = [b'.'; NUM_SQUARES];
        for (i, color) in self.colors.iter().enumerate() {
            symbols[i] = color_symbol(*color) as u8;
        }
        Fingerprint(symbols)
    }

    pub fn occupied(&self) -> usize {
        self.colors.iter().filter(|c| c.is_some()).count()
    }
}

impl Default for SensorFrame {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compact per-square symbol string (`W`, `B`, `.`) used for debouncing
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; NUM_SQUARES]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; NUM_SQUARES] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // rank-major, separated by '/' like FEN but always rank 0 first
        for (i, chunk) in self.0.chunks(8).enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for b in chunk {
                write!(f, "{}", *b as char)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magchess_sensors::{CalibrationTable, SensorSnapshot};

    fn settings() -> SensorSettings {
        SensorSettings::new(500, CalibrationTable::uniform(32750))
    }

    #[test]
    fn test_classify_bands() {
        //! Below the band is white, above is black, inside is empty
        assert_eq!(classify(32249.0, 32750, 500), Some(Color::White));
        assert_eq!(classify(32250.0, 32750, 500), None);
        assert_eq!(classify(32750.0, 32750, 500), None);
        assert_eq!(classify(33250.0, 32750, 500), None);
        assert_eq!(classify(33251.0, 32750, 500), Some(Color::Black));
    }

    #[test]
    fn test_classify_is_monotone() {
        //! Past either edge the answer never changes, and the two edges are opposite
        let mut last_white = None;
        let mut first_black = None;
        for v in (30000..36000).step_by(7) {
            match classify(v as f64, 33000, 400) {
                Some(Color::White) => {
                    assert!(first_black.is_none());
                    last_white = Some(v);
                }
                Some(Color::Black) => {
                    first_black.get_or_insert(v);
                }
                None => assert!(first_black.is_none()),
            }
        }
        assert!(last_white.unwrap() < 32600);
        assert!(first_black.unwrap() > 33400);
    }

    #[test]
    fn test_classify_out_of_range_values() {
        assert_eq!(classify(f64::NEG_INFINITY, 0, 1), Some(Color::White));
        assert_eq!(classify(f64::INFINITY, 0, 1), Some(Color::Black));
        assert_eq!(classify(f64::NAN, 0, 1), None);
    }

    #[test]
    fn test_extreme_baselines_saturate() {
        //! A hand-edited baseline at the i64 limits clamps its band instead of overflowing
        assert_eq!(classify(0.0, i64::MAX, 500), Some(Color::White));
        assert_eq!(classify(0.0, i64::MIN, 500), Some(Color::Black));

        let settings = SensorSettings::new(500, CalibrationTable::uniform(i64::MAX));
        let mut cell = Cell::new(Coords::new(0, 0).unwrap(), &settings);
        assert_eq!(cell.threshold_high(), i64::MAX);
        cell.update(0.0);
        assert_eq!(cell.detected_color(), Some(Color::White));
    }

    #[test]
    fn test_cell_update_tracks_latest_only() {
        let mut cell = Cell::new(Coords::new(2, 2).unwrap(), &settings());
        assert_eq!(cell.threshold_low(), 32250);
        assert_eq!(cell.threshold_high(), 33250);

        cell.update(31000.0);
        assert_eq!(cell.detected_color(), Some(Color::White));
        cell.update(32800.0);
        assert_eq!(cell.detected_color(), None);
        assert_eq!(cell.symbol(), '.');
    }

    #[test]
    fn test_per_square_baselines() {
        //! Each cell classifies against its own calibration entry
        let mut table = CalibrationTable::uniform(32750);
        let odd = Coords::new(6, 1).unwrap();
        table.set_baseline(odd, 20000);
        let mut grid = CellGrid::new(&SensorSettings::new(500, table));

        let frame = grid.update_from(&SensorSnapshot::uniform(32750.0));
        assert_eq!(frame.get(odd), Some(Color::Black));
        assert_eq!(frame.occupied(), 1);
    }

    #[test]
    fn test_fingerprint_symbols() {
        let mut frame = SensorFrame::empty();
        frame.set(Coords::new(0, 0).unwrap(), Some(Color::White));
        frame.set(Coords::new(1, 0).unwrap(), Some(Color::Black));
        let text = frame.fingerprint().to_string();
        assert!(text.starts_with("WB....../"));
        assert_eq!(text.len(), 64 + 7);
    }
}
