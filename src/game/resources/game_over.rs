//! Game over state tracking and result management
//!
//! Tracks end-game conditions and provides methods for determining game
//! outcome and displaying results.
//!
//! # Game Over Conditions
//!
//! ## Checkmate
//! - **WhiteWon**: Black is in check with no legal moves
//! - **BlackWon**: White is in check with no legal moves
//!
//! ## Draw Conditions
//! - **Stalemate**: Current player has no legal moves but is NOT in check
//! - **InsufficientMaterial**: Neither player can deliver checkmate (e.g., K vs K)
//! - **Draw**: Any other terminal outcome reported by the rules engine
//!
//! # Integration
//!
//! Set by [`crate::game::manager::BoardStateManager`] after each commit via
//! [`crate::game::rules::engine::outcome`]; read by the PGN exporter and the
//! game-over notification.

use shakmaty::Color;

/// The game's end state
///
/// All non-Playing states are terminal: the manager stops committing moves
/// until a new game is detected.
///
/// ```text
/// Playing → WhiteWon / BlackWon / Stalemate / InsufficientMaterial / Draw
/// ```
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameOverState {
    /// Game is still in progress
    #[default]
    Playing,

    /// White won by checkmate
    WhiteWon,

    /// Black won by checkmate
    BlackWon,

    /// Draw by stalemate
    ///
    /// Current player has no legal moves but is NOT in check.
    Stalemate,

    /// Draw by insufficient material
    ///
    /// Neither player has enough pieces to deliver checkmate. Examples:
    /// - King vs King
    /// - King + Bishop vs King
    /// - King + Knight vs King
    InsufficientMaterial,

    /// Any other drawn outcome
    Draw,
}

impl GameOverState {
    /// Check if the game has ended
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameOverState::Playing)
    }

    /// Human-readable message describing the game result
    pub fn message(&self) -> &'static str {
        match self {
            GameOverState::Playing => "Game in progress",
            GameOverState::WhiteWon => "White wins by checkmate!",
            GameOverState::BlackWon => "Black wins by checkmate!",
            GameOverState::Stalemate => "Draw by stalemate",
            GameOverState::InsufficientMaterial => "Draw by insufficient material",
            GameOverState::Draw => "Draw",
        }
    }

    /// The winner of the game, if there is one
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOverState::WhiteWon => Some(Color::White),
            GameOverState::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    /// Check if the game ended in a draw
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameOverState::Stalemate | GameOverState::InsufficientMaterial | GameOverState::Draw
        )
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self, GameOverState::WhiteWon | GameOverState::BlackWon)
    }

    /// PGN result token
    pub fn pgn_result(&self) -> &'static str {
        match self {
            GameOverState::Playing => "*",
            GameOverState::WhiteWon => "1-0",
            GameOverState::BlackWon => "0-1",
            _ => "1/2-1/2",
        }
    }
}
