//! Coordinate mapping between sensors and chess squares
//!
//! Sensors are addressed by physical [`Coords`]; the rules engine and the
//! piece layout use algebraic [`Square`]s. The two agree when white set up on
//! raw ranks 0-1. When the board was set up from the other side (`flipped`),
//! the mapping is a 180 degree rotation: raw (0, 0) is `h8`.

use magchess_sensors::Coords;
use shakmaty::{Color, File, Rank, Square};

/// Chess square seen by the sensor at `coords`
pub fn square_at(coords: Coords, flipped: bool) -> Square {
    let coords = if flipped { coords.rotated() } else { coords };
    Square::from_coords(File::new(coords.file as u32), Rank::new(coords.rank as u32))
}

/// Sensor that sits under `square`
pub fn coords_of(square: Square, flipped: bool) -> Coords {
    let coords = Coords {
        file: u32::from(square.file()) as u8,
        rank: u32::from(square.rank()) as u8,
    };
    if flipped {
        coords.rotated()
    } else {
        coords
    }
}

/// Rank index (0-7) a pawn of `color` promotes on
pub const fn promotion_rank(color: Color) -> u32 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

pub fn file_index(square: Square) -> i32 {
    u32::from(square.file()) as i32
}

pub fn rank_index(square: Square) -> i32 {
    u32::from(square.rank()) as i32
}

/// Human-readable side name
pub const fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
