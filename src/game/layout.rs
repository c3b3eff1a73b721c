//! Believed piece placement
//!
//! [`PieceLayout`] is the physical truth as currently believed: which
//! identity-bearing piece sits on which square. It is cloned freely; a
//! clone used for speculative application is the staging layout.

use crate::game::components::Piece;
use crate::game::types::file_index;
use shakmaty::{Board, Chess, Position, Square};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceLayout {
    pieces: BTreeMap<Square, Piece>,
}

impl PieceLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Spawn a fresh piece for every occupied square of `board`
    pub fn from_board(board: &Board) -> Self {
        let mut layout = Self::empty();
        for index in 0..64u32 {
            let square = Square::new(index);
            if let Some(piece) = board.piece_at(square) {
                layout.place(square, Piece::spawn(piece.color, piece.role));
            }
        }
        layout
    }

    /// The 32 pieces of the standard starting position
    pub fn standard_start() -> Self {
        Self::from_board(Chess::default().board())
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<&Piece> {
        self.pieces.get(&square)
    }

    /// Put `piece` on `square`, returning whatever was there
    pub fn place(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.pieces.insert(square, piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.pieces.remove(&square)
    }

    /// Move the piece on `from` to `to`, returning anything displaced on `to`
    ///
    /// No-op returning `None` when `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        match self.pieces.remove(&from) {
            Some(piece) => self.pieces.insert(to, piece),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces in square order (a1, b1, ... h8)
    pub fn iter(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.pieces.iter().map(|(sq, p)| (*sq, p))
    }

    /// First square holding a piece with this identity
    pub fn square_of(&self, piece: &Piece) -> Option<Square> {
        self.iter().find(|(_, p)| p.id == piece.id).map(|(sq, _)| sq)
    }

    /// First square whose occupant differs in color/role from `board`
    ///
    /// `None` means the layout and the rules board agree on every square.
    pub fn first_mismatch(&self, board: &Board) -> Option<Square> {
        (0..64u32).map(Square::new).find(|&square| {
            let believed = self.get(square).map(|p| shakmaty::Piece::from(*p));
            believed != board.piece_at(square)
        })
    }

    pub fn matches_board(&self, board: &Board) -> bool {
        self.first_mismatch(board).is_none()
    }
}

impl fmt::Display for PieceLayout {
    /// Eight lines, rank 8 first, `.` for empty squares
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u32).rev() {
            for file in 0..8u32 {
                let square = Square::new(rank * 8 + file);
                let symbol = self.get(square).map_or('.', Piece::symbol);
                if file_index(square) > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", symbol)?;
            }
            if rank > 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
