//! Frame-to-layout diffing
//!
//! Compares what the sensors see against a believed layout, square by
//! square, after mapping raw coordinates through the game's orientation:
//!
//! | Layout       | Sensor         | Record          |
//! |--------------|----------------|-----------------|
//! | piece        | empty          | [`MissingPiece`] |
//! | empty        | color          | [`NewPiece`]     |
//! | piece        | other color    | [`ColorSwap`]    |
//!
//! Everything else (empty/empty, same color) produces no record.

use crate::game::cell::SensorFrame;
use crate::game::components::Piece;
use crate::game::layout::PieceLayout;
use shakmaty::{Color, Square};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingPiece {
    pub piece: Piece,
    pub square: Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPiece {
    pub color: Color,
    pub square: Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSwap {
    pub old_piece: Piece,
    pub new_color: Color,
    pub square: Square,
}

/// Record counts `(missing, new, swaps)`, used for dispatch and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffShape {
    pub missing: usize,
    pub new: usize,
    pub swaps: usize,
}

impl fmt::Display for DiffShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.missing, self.new, self.swaps)
    }
}

/// Records produced by one comparison, in square order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDiff {
    pub missing: Vec<MissingPiece>,
    pub new: Vec<NewPiece>,
    pub swaps: Vec<ColorSwap>,
}

impl BoardDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.new.is_empty() && self.swaps.is_empty()
    }

    pub fn shape(&self) -> DiffShape {
        DiffShape {
            missing: self.missing.len(),
            new: self.new.len(),
            swaps: self.swaps.len(),
        }
    }
}

/// Compare `frame` against `reference`
pub fn diff(frame: &SensorFrame, reference: &PieceLayout, flipped: bool) -> BoardDiff {
    let mut result = BoardDiff::default();

    for (_, square, detected) in frame.squares(flipped) {
        match (reference.get(square), detected) {
            (Some(piece), None) => result.missing.push(MissingPiece {
                piece: *piece,
                square,
            }),
            (None, Some(color)) => result.new.push(NewPiece { color, square }),
            (Some(piece), Some(color)) if piece.color != color => result.swaps.push(ColorSwap {
                old_piece: *piece,
                new_color: color,
                square,
            }),
            _ => {}
        }
    }

    result
}
