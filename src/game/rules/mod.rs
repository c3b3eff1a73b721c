//! Chess rules module - Committed positions and the rules engine boundary
//!
//! # Architecture
//!
//! - `engine` - thin adapter over `shakmaty`; the crate never reimplements
//!   move legality, check detection or notation
//! - `board_state` - [`BoardState`], the immutable committed snapshot that
//!   pairs a rules board with the believed piece layout
//!
//! A [`BoardState`] can only be produced by a validated move application
//! (or the standard start / a parsed FEN), so its layout and rules board
//! always agree.

pub mod board_state;
pub mod engine;


pub use board_state::BoardState;
pub use engine::CastlingSquares;
