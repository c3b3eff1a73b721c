//! Game state components

use serde::Serialize;

/// Lifecycle of the game the manager is tracking
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GamePhase {
    /// No game yet; waiting for a starting layout
    #[default]
    Setup,
    /// Moves are being inferred and committed
    Playing,
    /// Terminal outcome reached; only review remains live
    Over,
}

impl GamePhase {
    /// New-game detection runs only while no game is being played
    pub fn accepts_new_game(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// The move that produced a committed state
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// Coordinate notation, e.g. `e7e8q`
    pub uci: String,
    /// Standard algebraic notation with check suffix, e.g. `e8=Q+`
    pub san: String,
    pub is_capture: bool,
    pub is_castling: bool,
    pub is_en_passant: bool,
    pub is_promotion: bool,
}
