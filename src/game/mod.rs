//! Board-state inference - From occupancy frames to a legal game record
//!
//! The sensors only know color and occupancy. This module keeps the last
//! committed positions and decides, frame by frame, which single legal move
//! (if any) explains what the board now shows.
//!
//! # Module Organization
//!
//! - `cell` - per-square signal classification, frames and fingerprints
//! - `types` - sensor coordinate ⇄ chess square mapping (orientation)
//! - `components` - identity-bearing pieces, move records, game phase
//! - `layout` - believed piece placement
//! - `diff` - frame vs. layout comparison into missing/new/swap records
//! - `classifier` - diff shape → [`classifier::MoveShape`] → candidate move
//! - `rules` - committed [`rules::BoardState`] and the `shakmaty` binding
//! - `resources` - history, review cursor, game-over state
//! - `manager` - the per-tick state machine
//! - `export` - PGN and FEN
//!
//! # Tick Pipeline
//!
//! 1. `CellGrid::update_from` classifies the latest readings into a frame
//! 2. `BoardStateManager::tick` debounces on the frame fingerprint
//! 3. `diff` + `classify` against the current (then previous) state
//! 4. `BoardState::apply` validates and builds the next state atomically
//! 5. Render commands go out to the display thread

pub mod cell;
pub mod classifier;
pub mod components;
pub mod diff;
pub mod error;
pub mod export;
pub mod layout;
pub mod manager;
pub mod resources;
pub mod rules;
pub mod types;

pub use cell::{classify as classify_reading, Cell, CellGrid, Fingerprint, SensorFrame};
pub use classifier::{classify, AmbiguityReason, CandidateMove, MoveShape};
pub use components::{GamePhase, MoveRecord, Piece, PieceId};
pub use diff::{diff, BoardDiff, ColorSwap, DiffShape, MissingPiece, NewPiece};
pub use error::{GameError, GameResult};
pub use export::PgnHeaders;
pub use layout::PieceLayout;
pub use manager::{BoardStateManager, Rejection, TickOutcome};
pub use resources::{BoardHistory, GameOverState, GameReview};
pub use rules::BoardState;
