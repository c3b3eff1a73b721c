//! Tests for game components

use super::*;
use shakmaty::{Color, Role};

#[test]
fn test_spawned_pieces_have_distinct_ids() {
    //! Two identical pawns are still different pieces
    let a = Piece::spawn(Color::White, Role::Pawn);
    let b = Piece::spawn(Color::White, Role::Pawn);
    assert_ne!(a.id, b.id);
    assert!(a.same_kind(&b));
}

#[test]
fn test_promotion_replaces_identity() {
    //! Promotion yields a queen of the same color with a new id
    let pawn = Piece::spawn(Color::Black, Role::Pawn);
    let queen = pawn.promoted();
    assert_eq!(queen.role, Role::Queen);
    assert_eq!(queen.color, Color::Black);
    assert_ne!(queen.id, pawn.id);
}

#[test]
fn test_piece_symbols() {
    assert_eq!(Piece::spawn(Color::White, Role::Knight).symbol(), 'N');
    assert_eq!(Piece::spawn(Color::Black, Role::King).symbol(), 'k');
}

#[test]
fn test_game_phase_default_and_new_game_gate() {
    assert_eq!(GamePhase::default(), GamePhase::Setup);
    assert!(GamePhase::Setup.accepts_new_game());
    assert!(GamePhase::Over.accepts_new_game());
    assert!(!GamePhase::Playing.accepts_new_game());
}
