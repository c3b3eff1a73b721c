//! MagChess - move inference for a magnetic-sensor chessboard
//!
//! A board with one hall-effect sensor under each square reports, for every
//! square, "white piece", "black piece" or "empty". It cannot tell a knight
//! from a queen. This crate turns that stream of occupancy frames into a
//! legal game record by comparing each frame against the last accepted
//! position and asking the rules engine which single move explains it.
//!
//! # Module Layout
//!
//! - [`core`] - Configuration, logging setup and top-level errors
//! - [`game`] - Cells, layout diffing, move classification, validation and
//!   the board state manager
//! - [`display`] - Render commands and the display sink boundary
//! - [`runtime`] - Tokio wiring of acquisition, inference and console input
//!
//! Raw readings come from the `magchess-sensors` crate.

pub mod core;
pub mod display;
pub mod game;
pub mod runtime;

pub use magchess_sensors as sensors;
