//! Error types for game module
//!
//! Every variant here is recoverable: the board state manager turns them into
//! notifications and keeps polling. None of them ever leaves a tick.

use shakmaty::Square;

/// Errors that can occur while validating or committing a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Candidate string is not coordinate notation
    #[error("Unparsable move: {uci}")]
    UnparsableMove { uci: String },

    /// Structurally valid candidate rejected by the rules engine
    #[error("Illegal move: {uci}")]
    IllegalMove { uci: String },

    /// Staging layout disagrees with the rules board after applying a move
    #[error("Layout out of sync with rules board at {square} after {uci}")]
    LayoutMismatch { uci: String, square: Square },

    /// Operation needs an active game
    #[error("No active game")]
    NoActiveGame,

    /// Position could not be set up from FEN
    #[error("Invalid position: {message}")]
    InvalidPosition { message: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
