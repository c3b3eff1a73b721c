//! Game resources - State owned by the board state manager
//!
//! # Resource Categories
//!
//! ## Game History
//! - [`BoardHistory`] - Committed board states, oldest first
//! - [`GameReview`] - Read-only cursor over a history snapshot
//!
//! ## Game Status
//! - [`GameOverState`] - Win/loss/draw conditions
//!
//! The manager is the only writer of [`BoardHistory`]; everything else sees
//! clones.

pub mod game_over;
pub mod history;
pub mod review;


pub use game_over::*;
pub use history::*;
pub use review::*;
