//! Chess game components module
//!
//! Plain data carried inside board states: identity-bearing pieces and the
//! per-commit move record.

pub mod game_state;
pub mod piece;

#[cfg(test)]
mod tests;

pub use game_state::*;
pub use piece::*;
