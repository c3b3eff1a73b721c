//! Move classification
//!
//! Turns a [`BoardDiff`] into a [`MoveShape`] by the exact shape of the diff:
//!
//! | Shape     | Meaning                                             |
//! |-----------|-----------------------------------------------------|
//! | `(0,0,0)` | nothing moved                                       |
//! | `(1,1,0)` | one piece relocated to an empty square              |
//! | `(1,0,1)` | one piece lifted, one square changed color: capture |
//! | `(2,1,0)` | mover and victim lifted, mover lands: en passant    |
//! | `(2,2,0)` | king and rook lifted, both land: castling           |
//!
//! Anything else is [`MoveShape::Ambiguous`]. The classifier only checks
//! structure; legality is the rules engine's call. Promotion is orthogonal:
//! any pawn arriving on its last rank becomes a queen.

use crate::game::components::Piece;
use crate::game::diff::{BoardDiff, ColorSwap, DiffShape, MissingPiece, NewPiece};
use crate::game::layout::PieceLayout;
use crate::game::rules::{engine, BoardState};
use crate::game::types::{file_index, promotion_rank, rank_index};
use shakmaty::{Role, Square};
use std::fmt;

/// Why a diff could not be read as a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityReason {
    /// Lifted and placed colors differ
    ColorMismatch,
    /// King moved two files with its rook still at home
    KingWithoutRook,
    /// Pawn moved like an en passant capture but the victim is still there
    EnPassantWithoutCapture,
    /// Two lifts that are not a legal en passant pair
    NotEnPassant,
    /// Two lifts and two landings that are not a legal castling
    NotCastling,
    /// Diff shape outside the known move patterns
    UnknownShape,
}

impl fmt::Display for AmbiguityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AmbiguityReason::ColorMismatch => "piece changed color",
            AmbiguityReason::KingWithoutRook => "king castled without its rook",
            AmbiguityReason::EnPassantWithoutCapture => "en passant without removing the pawn",
            AmbiguityReason::NotEnPassant => "two pieces lifted",
            AmbiguityReason::NotCastling => "not a castling pattern",
            AmbiguityReason::UnknownShape => "unrecognized pattern",
        };
        f.write_str(text)
    }
}

/// What a diff structurally looks like
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveShape {
    /// Board matches the reference layout
    None,
    Simple {
        piece: Piece,
        from: Square,
        to: Square,
    },
    Capture {
        piece: Piece,
        from: Square,
        to: Square,
        captured: Piece,
    },
    EnPassant {
        piece: Piece,
        from: Square,
        to: Square,
        captured: Piece,
        captured_on: Square,
    },
    Castle {
        king: Piece,
        king_from: Square,
        king_to: Square,
        rook_from: Square,
        rook_to: Square,
    },
    Ambiguous {
        shape: DiffShape,
        reason: AmbiguityReason,
    },
}

impl MoveShape {
    /// Candidate to submit to the rules engine, if the shape names one
    pub fn candidate(&self) -> Option<CandidateMove> {
        match *self {
            MoveShape::Simple { piece, from, to } | MoveShape::Capture { piece, from, to, .. } => {
                let captured = match self {
                    MoveShape::Capture { .. } => Some(to),
                    _ => None,
                };
                Some(CandidateMove {
                    from,
                    to,
                    captured,
                    promotion: promotes(&piece, to),
                    rook: None,
                })
            }
            MoveShape::EnPassant {
                from,
                to,
                captured_on,
                ..
            } => Some(CandidateMove {
                from,
                to,
                captured: Some(captured_on),
                promotion: false,
                rook: None,
            }),
            MoveShape::Castle {
                king_from,
                king_to,
                rook_from,
                rook_to,
                ..
            } => Some(CandidateMove {
                from: king_from,
                to: king_to,
                captured: None,
                promotion: false,
                rook: Some((rook_from, rook_to)),
            }),
            MoveShape::None | MoveShape::Ambiguous { .. } => None,
        }
    }
}

fn promotes(piece: &Piece, to: Square) -> bool {
    piece.role == Role::Pawn && rank_index(to) as u32 == promotion_rank(piece.color)
}

/// A structurally plausible move, addressed in coordinate notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMove {
    pub from: Square,
    pub to: Square,
    /// Square emptied by the capture (differs from `to` for en passant)
    pub captured: Option<Square>,
    /// Pawn reaches its last rank; always promotes to a queen
    pub promotion: bool,
    /// Rook origin and destination when castling
    pub rook: Option<(Square, Square)>,
}

impl CandidateMove {
    /// Plain relocation, optionally promoting
    pub fn simple(from: Square, to: Square, promotion: bool) -> Self {
        Self {
            from,
            to,
            captured: None,
            promotion,
            rook: None,
        }
    }

    /// Coordinate notation, e.g. `e2e4` or `e7e8q`
    pub fn uci(&self) -> String {
        let suffix = if self.promotion { "q" } else { "" };
        format!("{}{}{}", self.from, self.to, suffix)
    }

    /// Apply to a staging layout
    ///
    /// The captured piece is retired, the mover keeps its identity (or is
    /// replaced by a queen on promotion) and a castling rook comes along.
    pub fn apply_to(&self, layout: &mut PieceLayout) {
        if let Some(square) = self.captured {
            layout.remove(square);
        }
        layout.relocate(self.from, self.to);
        if let Some((rook_from, rook_to)) = self.rook {
            layout.relocate(rook_from, rook_to);
        }
        if self.promotion {
            if let Some(pawn) = layout.get(self.to).copied() {
                layout.place(self.to, pawn.promoted());
            }
        }
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uci())
    }
}

/// Read `diff` (taken against `against.layout`) as a move shape
pub fn classify(diff: &BoardDiff, against: &BoardState) -> MoveShape {
    let shape = diff.shape();
    let ambiguous = |reason: AmbiguityReason| MoveShape::Ambiguous { shape, reason };

    match (diff.missing.as_slice(), diff.new.as_slice(), diff.swaps.as_slice()) {
        ([], [], []) => MoveShape::None,
        ([lifted], [placed], []) => relocation(lifted, placed, against).unwrap_or_else(ambiguous),
        ([lifted], [], [swap]) => capture(lifted, swap).unwrap_or_else(ambiguous),
        ([a, b], [placed], []) => en_passant(a, b, placed, against).unwrap_or_else(ambiguous),
        ([a, b], [p, q], []) => castle(a, b, p, q, against).unwrap_or_else(ambiguous),
        _ => ambiguous(AmbiguityReason::UnknownShape),
    }
}

fn relocation(
    lifted: &MissingPiece,
    placed: &NewPiece,
    against: &BoardState,
) -> Result<MoveShape, AmbiguityReason> {
    let piece = lifted.piece;
    let (from, to) = (lifted.square, placed.square);

    if piece.color != placed.color {
        return Err(AmbiguityReason::ColorMismatch);
    }
    if piece.role == Role::King
        && rank_index(from) == rank_index(to)
        && (file_index(from) - file_index(to)).abs() == 2
    {
        return Err(AmbiguityReason::KingWithoutRook);
    }
    if piece.role == Role::Pawn && engine::is_en_passant(&against.rules_board, from, to) {
        return Err(AmbiguityReason::EnPassantWithoutCapture);
    }

    Ok(MoveShape::Simple { piece, from, to })
}

fn capture(lifted: &MissingPiece, swap: &ColorSwap) -> Result<MoveShape, AmbiguityReason> {
    if swap.new_color != lifted.piece.color {
        return Err(AmbiguityReason::ColorMismatch);
    }
    Ok(MoveShape::Capture {
        piece: lifted.piece,
        from: lifted.square,
        to: swap.square,
        captured: swap.old_piece,
    })
}

fn en_passant(
    a: &MissingPiece,
    b: &MissingPiece,
    placed: &NewPiece,
    against: &BoardState,
) -> Result<MoveShape, AmbiguityReason> {
    if a.piece.color == b.piece.color {
        return Err(AmbiguityReason::NotEnPassant);
    }
    let (mover, victim) = if a.piece.color == placed.color { (a, b) } else { (b, a) };
    if mover.piece.role != Role::Pawn || victim.piece.role != Role::Pawn {
        return Err(AmbiguityReason::NotEnPassant);
    }

    let (from, to) = (mover.square, placed.square);
    let behind = Square::from_coords(to.file(), from.rank());
    if victim.square != behind || !engine::is_en_passant(&against.rules_board, from, to) {
        return Err(AmbiguityReason::NotEnPassant);
    }

    Ok(MoveShape::EnPassant {
        piece: mover.piece,
        from,
        to,
        captured: victim.piece,
        captured_on: victim.square,
    })
}

fn castle(
    a: &MissingPiece,
    b: &MissingPiece,
    p: &NewPiece,
    q: &NewPiece,
    against: &BoardState,
) -> Result<MoveShape, AmbiguityReason> {
    let (king, rook) = match (a.piece.role, b.piece.role) {
        (Role::King, Role::Rook) => (a, b),
        (Role::Rook, Role::King) => (b, a),
        _ => return Err(AmbiguityReason::NotCastling),
    };
    let color = king.piece.color;
    if rook.piece.color != color || p.color != color || q.color != color {
        return Err(AmbiguityReason::NotCastling);
    }

    engine::castling_options(&against.rules_board)
        .into_iter()
        .find(|c| {
            c.king_from == king.square
                && c.rook_from == rook.square
                && ((c.king_to == p.square && c.rook_to == q.square)
                    || (c.king_to == q.square && c.rook_to == p.square))
        })
        .map(|c| MoveShape::Castle {
            king: king.piece,
            king_from: c.king_from,
            king_to: c.king_to,
            rook_from: c.rook_from,
            rook_to: c.rook_to,
        })
        .ok_or(AmbiguityReason::NotCastling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cell::SensorFrame;
    use crate::game::diff::diff;
    use shakmaty::Color;

    fn frame_of(state: &BoardState) -> SensorFrame {
        SensorFrame::from_layout(&state.layout, false)
    }

    fn shape_after(state: &BoardState, edit: impl FnOnce(&mut SensorFrame)) -> MoveShape {
        let mut frame = frame_of(state);
        edit(&mut frame);
        classify(&diff(&frame, &state.layout, false), state)
    }

    #[test]
    fn test_no_change_is_none() {
        let state = BoardState::standard_start();
        assert_eq!(shape_after(&state, |_| {}), MoveShape::None);
    }

    #[test]
    fn test_simple_pawn_push() {
        let state = BoardState::standard_start();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E2, false, None);
            f.set_on(Square::E4, false, Some(Color::White));
        });
        let candidate = shape.candidate().unwrap();
        assert_eq!(candidate.uci(), "e2e4");
        assert!(candidate.captured.is_none());
    }

    #[test]
    fn test_relocation_color_mismatch() {
        let state = BoardState::standard_start();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E2, false, None);
            f.set_on(Square::E4, false, Some(Color::Black));
        });
        assert!(matches!(
            shape,
            MoveShape::Ambiguous { reason: AmbiguityReason::ColorMismatch, .. }
        ));
    }

    #[test]
    fn test_king_two_files_alone_rejected() {
        //! A king landing on g1 with the rook still on h1 is not a move
        let state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E1, false, None);
            f.set_on(Square::G1, false, Some(Color::White));
        });
        assert!(matches!(
            shape,
            MoveShape::Ambiguous { reason: AmbiguityReason::KingWithoutRook, .. }
        ));
    }

    #[test]
    fn test_castle_kingside() {
        let state = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E1, false, None);
            f.set_on(Square::H1, false, None);
            f.set_on(Square::G1, false, Some(Color::White));
            f.set_on(Square::F1, false, Some(Color::White));
        });
        let candidate = shape.candidate().unwrap();
        assert_eq!(candidate.uci(), "e1g1");
        assert_eq!(candidate.rook, Some((Square::H1, Square::F1)));
    }

    #[test]
    fn test_castle_through_check_is_not_a_pattern() {
        //! Castling squares must come from a currently legal castling move
        let state = BoardState::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E1, false, None);
            f.set_on(Square::H1, false, None);
            f.set_on(Square::G1, false, Some(Color::White));
            f.set_on(Square::F1, false, Some(Color::White));
        });
        assert!(matches!(
            shape,
            MoveShape::Ambiguous { reason: AmbiguityReason::NotCastling, .. }
        ));
    }

    #[test]
    fn test_en_passant_pattern() {
        let state = BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E5, false, None);
            f.set_on(Square::D5, false, None);
            f.set_on(Square::D6, false, Some(Color::White));
        });
        let candidate = shape.candidate().unwrap();
        assert_eq!(candidate.uci(), "e5d6");
        assert_eq!(candidate.captured, Some(Square::D5));
    }

    #[test]
    fn test_en_passant_without_lifting_victim() {
        let state = BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E5, false, None);
            f.set_on(Square::D6, false, Some(Color::White));
        });
        assert!(matches!(
            shape,
            MoveShape::Ambiguous { reason: AmbiguityReason::EnPassantWithoutCapture, .. }
        ));
    }

    #[test]
    fn test_promotion_flag_and_suffix() {
        let state = BoardState::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::E7, false, None);
            f.set_on(Square::E8, false, Some(Color::White));
        });
        let candidate = shape.candidate().unwrap();
        assert!(candidate.promotion);
        assert_eq!(candidate.uci(), "e7e8q");
    }

    #[test]
    fn test_three_lifts_is_unknown_shape() {
        let state = BoardState::standard_start();
        let shape = shape_after(&state, |f| {
            f.set_on(Square::A2, false, None);
            f.set_on(Square::B2, false, None);
            f.set_on(Square::C2, false, None);
        });
        assert_eq!(
            shape,
            MoveShape::Ambiguous {
                shape: DiffShape { missing: 3, new: 0, swaps: 0 },
                reason: AmbiguityReason::UnknownShape,
            }
        );
        assert!(shape.candidate().is_none());
    }

    #[test]
    fn test_apply_to_retires_captured_piece() {
        let mut layout = PieceLayout::standard_start();
        let knight = *layout.get(Square::G1).unwrap();
        let victim = *layout.get(Square::G8).unwrap();
        let candidate = CandidateMove {
            from: Square::G1,
            to: Square::G8,
            captured: Some(Square::G8),
            promotion: false,
            rook: None,
        };
        candidate.apply_to(&mut layout);
        assert_eq!(layout.get(Square::G8).unwrap().id, knight.id);
        assert!(layout.square_of(&victim).is_none());
        assert_eq!(layout.len(), 31);
    }
}
