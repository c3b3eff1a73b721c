//! Identity-bearing pieces
//!
//! A [`Piece`] keeps its [`PieceId`] for its whole life on the board: the
//! same id moves from `e2` to `e4`. A capture retires the id; a promotion
//! retires the pawn's id and spawns a queen with a fresh one.

use shakmaty::{Color, Role};
use std::fmt;
use uuid::Uuid;

/// Stable identity assigned at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(Uuid);

impl PieceId {
    pub fn new() -> Self {
        PieceId(Uuid::new_v4())
    }
}

impl Default for PieceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// One physical piece believed to be on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// New piece with a fresh identity
    pub fn spawn(color: Color, role: Role) -> Self {
        Self {
            id: PieceId::new(),
            color,
            role,
        }
    }

    /// Replacement queen for a promoting pawn (new identity, same color)
    pub fn promoted(&self) -> Self {
        Self::spawn(self.color, Role::Queen)
    }

    /// FEN letter: uppercase for white
    pub fn symbol(&self) -> char {
        shakmaty::Piece {
            color: self.color,
            role: self.role,
        }
        .char()
    }

    /// Same color and role, regardless of identity
    pub fn same_kind(&self, other: &Piece) -> bool {
        self.color == other.color && self.role == other.role
    }
}

impl From<Piece> for shakmaty::Piece {
    fn from(piece: Piece) -> Self {
        shakmaty::Piece {
            color: piece.color,
            role: piece.role,
        }
    }
}
