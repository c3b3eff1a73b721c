//! Rules engine binding
//!
//! The only place the crate talks to `shakmaty`. Everything chess-legal
//! (move generation, check, mate, FEN, SAN) is delegated; this module just
//! adapts the calls to coordinate-notation strings and the crate's error
//! type.

use crate::game::error::{GameError, GameResult};
use crate::game::resources::GameOverState;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Square};

/// Squares involved in one legal castling move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingSquares {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// Find the legal move named by coordinate notation (`"e2e4"`, `"e7e8q"`)
///
/// Castling is addressed by the king's own squares (`"e1g1"`).
pub fn legal_move(position: &Chess, uci: &str) -> GameResult<Move> {
    let parsed: UciMove = uci.parse().map_err(|_| GameError::UnparsableMove {
        uci: uci.to_string(),
    })?;
    parsed.to_move(position).map_err(|_| GameError::IllegalMove {
        uci: uci.to_string(),
    })
}

/// Play a move already known to be legal
pub fn apply(position: &Chess, m: &Move) -> GameResult<Chess> {
    position.clone().play(m).map_err(|_| GameError::IllegalMove {
        uci: m.to_uci(CastlingMode::Standard).to_string(),
    })
}

/// Whether moving the pawn `from -> to` is a legal en passant capture
pub fn is_en_passant(position: &Chess, from: Square, to: Square) -> bool {
    position
        .legal_moves()
        .iter()
        .any(|m| m.is_en_passant() && m.from() == Some(from) && m.to() == to)
}

/// Every castling move currently legal for the side to move
pub fn castling_options(position: &Chess) -> Vec<CastlingSquares> {
    position
        .legal_moves()
        .iter()
        .filter_map(|m| match *m {
            Move::Castle { king, rook } => Some(castling_squares(king, rook)),
            _ => None,
        })
        .collect()
}

/// Standard-chess destinations for a king/rook castling pair
fn castling_squares(king: Square, rook: Square) -> CastlingSquares {
    let rank = king.rank();
    let (king_file, rook_file) = if rook.file() > king.file() {
        (shakmaty::File::G, shakmaty::File::F)
    } else {
        (shakmaty::File::C, shakmaty::File::D)
    };
    CastlingSquares {
        king_from: king,
        king_to: Square::from_coords(king_file, rank),
        rook_from: rook,
        rook_to: Square::from_coords(rook_file, rank),
    }
}

/// Terminal outcome of `position`, or `Playing`
pub fn outcome(position: &Chess) -> GameOverState {
    if position.is_checkmate() {
        match !position.turn() {
            Color::White => GameOverState::WhiteWon,
            Color::Black => GameOverState::BlackWon,
        }
    } else if position.is_stalemate() {
        GameOverState::Stalemate
    } else if position.is_insufficient_material() {
        GameOverState::InsufficientMaterial
    } else if position.outcome().is_some() {
        GameOverState::Draw
    } else {
        GameOverState::Playing
    }
}

/// SAN with check/mate suffix, computed before `m` is played
pub fn san(position: &Chess, m: &Move) -> String {
    SanPlus::from_move(position.clone(), m).to_string()
}

pub fn fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// Parse a FEN into a legal standard-chess position
pub fn position_from_fen(fen: &str) -> GameResult<Chess> {
    let parsed: Fen = fen.parse().map_err(|e| GameError::InvalidPosition {
        message: format!("{}", e),
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| GameError::InvalidPosition {
            message: format!("{}", e),
        })
}
