//! Integration tests for the board state manager
//!
//! Drives the full tick protocol with scripted sensor frames: each helper
//! edits the physical frame the way a player's hands would and runs one tick.

use crossbeam_channel::Receiver;
use magchess::display::{NotifyKind, RenderCommand, RenderSender};
use magchess::game::{
    BoardState, BoardStateManager, GameOverState, GamePhase, PgnHeaders, PieceLayout, Rejection,
    SensorFrame, TickOutcome,
};
use shakmaty::{Color, Position, Role, Square};

/// Physical board plus the manager watching it
struct Table {
    manager: BoardStateManager,
    rx: Receiver<RenderCommand>,
    frame: SensorFrame,
    flipped: bool,
}

impl Table {
    fn empty(flipped: bool) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            manager: BoardStateManager::new(RenderSender::new(tx)),
            rx,
            frame: SensorFrame::empty(),
            flipped,
        }
    }

    /// Pieces set up in the starting layout and recognized
    fn started(flipped: bool) -> Self {
        let mut table = Self::empty(flipped);
        table.frame = SensorFrame::from_layout(&PieceLayout::standard_start(), flipped);
        assert_eq!(table.tick(), TickOutcome::NewGame { flipped });
        table.drain();
        table
    }

    /// Game resumed from a position, frame matching it
    fn from_fen(fen: &str) -> Self {
        let mut table = Self::empty(false);
        let root = BoardState::from_fen(fen).unwrap();
        table.frame = SensorFrame::from_layout(&root.layout, false);
        table.manager.start_game(root, false);
        table.drain();
        table
    }

    fn tick(&mut self) -> TickOutcome {
        self.manager.tick(&self.frame)
    }

    fn lift(&mut self, square: Square) -> TickOutcome {
        self.frame.set_on(square, self.flipped, None);
        self.tick()
    }

    fn place(&mut self, square: Square, color: Color) -> TickOutcome {
        self.frame.set_on(square, self.flipped, Some(color));
        self.tick()
    }

    /// Lift and put down within one sensor frame
    fn slide(&mut self, from: Square, to: Square) -> TickOutcome {
        let color = self.frame.color_on(from, self.flipped);
        self.frame.set_on(from, self.flipped, None);
        self.frame.set_on(to, self.flipped, color);
        self.tick()
    }

    fn commit(&mut self, from: Square, to: Square) {
        let uci = format!("{}{}", from, to);
        assert_eq!(self.slide(from, to), TickOutcome::Committed { uci });
    }

    fn drain(&self) -> Vec<RenderCommand> {
        self.rx.try_iter().collect()
    }

    fn notifications(&self) -> Vec<(NotifyKind, String)> {
        self.drain()
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::Notify { kind, message } => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    fn current(&self) -> &BoardState {
        self.manager.current().unwrap()
    }

    fn plies(&self) -> usize {
        self.manager.history().len()
    }
}

// ============================================================================
// New Game Detection
// ============================================================================

#[test]
fn test_starting_layout_begins_game() {
    //! A recognized starting layout seeds history with the standard start
    let mut table = Table::empty(false);
    table.frame = SensorFrame::from_layout(&PieceLayout::standard_start(), false);

    assert_eq!(table.tick(), TickOutcome::NewGame { flipped: false });
    assert_eq!(table.plies(), 1);
    assert_eq!(table.current().player_to_move, Color::White);
    assert_eq!(table.manager.phase(), GamePhase::Playing);

    let commands = table.drain();
    assert!(commands.contains(&RenderCommand::SetPlayer(Color::White)));
    assert!(commands
        .iter()
        .any(|c| matches!(c, RenderCommand::Notify { kind: NotifyKind::NewGame, .. })));
}

#[test]
fn test_partial_setup_waits() {
    let mut table = Table::empty(false);
    table.frame = SensorFrame::from_layout(&PieceLayout::standard_start(), false);
    table.frame.set_on(Square::D1, false, None);

    assert_eq!(table.tick(), TickOutcome::AwaitingSetup);
    assert_eq!(table.place(Square::D1, Color::White), TickOutcome::NewGame { flipped: false });
}

#[test]
fn test_flipped_setup_detected_and_mapped() {
    //! Black on the near ranks means the board is read rotated by 180 degrees
    let mut table = Table::started(true);
    assert!(table.manager.is_flipped());

    table.commit(Square::E2, Square::E4);
    assert_eq!(table.current().player_to_move, Color::Black);

    // logical e4 sits on raw sensor d5 when flipped
    let raw = magchess::sensors::Coords::from_algebraic("d5").unwrap();
    assert_eq!(table.frame.get(raw), Some(Color::White));
}

// ============================================================================
// Commit Protocol
// ============================================================================

#[test]
fn test_pawn_push_commits() {
    //! e2 empties and e4 fills with white: one legal move, one new state
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);

    assert_eq!(table.plies(), 2);
    assert_eq!(table.current().player_to_move, Color::Black);
    let record = table.current().last_move.clone().unwrap();
    assert_eq!(record.uci, "e2e4");
    assert_eq!(record.san, "e4");
}

#[test]
fn test_pawn_keeps_identity_across_move() {
    let mut table = Table::started(false);
    let pawn = *table.current().layout.get(Square::E2).unwrap();
    table.commit(Square::E2, Square::E4);
    assert_eq!(table.current().layout.get(Square::E4).unwrap().id, pawn.id);
}

#[test]
fn test_capture_commits_and_destroys_victim() {
    //! After 1.e4 d5, lifting e4 and covering d5 with white is exd5
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::D7, Square::D5);
    let victim = *table.current().layout.get(Square::D5).unwrap();

    assert!(matches!(table.lift(Square::E4), TickOutcome::Rejected(_)));
    assert!(matches!(table.lift(Square::D5), TickOutcome::Rejected(_)));
    assert_eq!(
        table.place(Square::D5, Color::White),
        TickOutcome::Committed { uci: "e4d5".to_string() }
    );

    let layout = &table.current().layout;
    assert_eq!(layout.get(Square::D5).unwrap().color, Color::White);
    assert!(layout.square_of(&victim).is_none());
    assert_eq!(layout.len(), 31);
}

#[test]
fn test_direct_color_swap_capture() {
    //! The sensor may never see the square empty during a capture
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::D7, Square::D5);

    table.frame.set_on(Square::E4, false, None);
    table.frame.set_on(Square::D5, false, Some(Color::White));
    assert_eq!(table.tick(), TickOutcome::Committed { uci: "e4d5".to_string() });
}

#[test]
fn test_illegal_move_rejected_without_mutation() {
    let mut table = Table::started(false);
    let outcome = table.slide(Square::E2, Square::E5);

    match outcome {
        TickOutcome::Rejected(Rejection::Illegal { uci, .. }) => assert_eq!(uci, "e2e5"),
        other => panic!("expected illegal rejection, got {:?}", other),
    }
    assert_eq!(table.plies(), 1);

    let notes = table.notifications();
    assert_eq!(notes, vec![(NotifyKind::Illegal, "Illegal move e2e5".to_string())]);
}

#[test]
fn test_king_and_neighbour_vanish_is_unexpected() {
    //! Two same-colored non-pawns lifted and one square filled is not a move
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::E7, Square::E5);

    table.frame.set_on(Square::E1, false, None);
    table.frame.set_on(Square::F1, false, None);
    table.frame.set_on(Square::E2, false, Some(Color::White));
    let outcome = table.tick();

    assert!(matches!(
        outcome,
        TickOutcome::Rejected(Rejection::Unexpected { .. })
    ));
    assert_eq!(table.plies(), 3);
    let notes = table.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, NotifyKind::Unexpected);
}

#[test]
fn test_unchanged_frame_is_debounced() {
    //! Same fingerprint twice: no re-analysis, no duplicate notification
    let mut table = Table::started(false);
    assert!(matches!(table.slide(Square::E2, Square::E5), TickOutcome::Rejected(_)));
    table.drain();

    assert_eq!(table.tick(), TickOutcome::Unchanged);
    assert_eq!(table.tick(), TickOutcome::Unchanged);
    assert!(table.drain().is_empty());
    assert_eq!(table.plies(), 1);
}

#[test]
fn test_history_grows_by_at_most_one() {
    //! Every tick either adds exactly one state or leaves history alone
    let mut table = Table::started(false);
    let script = [
        (Square::G1, None),
        (Square::F3, Some(Color::White)),
        (Square::B8, None),
        (Square::C6, Some(Color::Black)),
        (Square::F3, None),
        (Square::E5, Some(Color::White)),
    ];
    for (square, color) in script {
        let before = table.plies();
        let outcome = match color {
            Some(color) => table.place(square, color),
            None => table.lift(square),
        };
        let after = table.plies();
        match outcome {
            TickOutcome::Committed { .. } => assert_eq!(after, before + 1),
            TickOutcome::RolledBack => assert_eq!(after, before - 1),
            _ => assert_eq!(after, before),
        }
    }
    assert_eq!(table.plies(), 4);
}

// ============================================================================
// Two-Level Rollback
// ============================================================================

#[test]
fn test_returning_pieces_rolls_back() {
    //! Putting the pawn back on e2 pops history to the start position
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.drain();

    assert_eq!(table.slide(Square::E4, Square::E2), TickOutcome::RolledBack);
    assert_eq!(table.plies(), 1);
    assert_eq!(table.current().player_to_move, Color::White);

    let commands = table.drain();
    assert!(commands.contains(&RenderCommand::SetPlayer(Color::White)));
    assert!(commands
        .iter()
        .any(|c| matches!(c, RenderCommand::Notify { kind: NotifyKind::TakeBack, .. })));
}

#[test]
fn test_changed_mind_replaces_last_move() {
    //! e4 committed, then the pawn is moved on to e3: read as e2e3 instead
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);

    assert_eq!(
        table.slide(Square::E4, Square::E3),
        TickOutcome::Replaced { uci: "e2e3".to_string() }
    );
    assert_eq!(table.plies(), 2);
    assert_eq!(table.current().last_move.as_ref().unwrap().uci, "e2e3");
    assert_eq!(table.current().player_to_move, Color::Black);
}

#[test]
fn test_no_rollback_past_two_states() {
    //! Only the last two committed states are compared against the board
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::E7, Square::E5);

    table.frame = SensorFrame::from_layout(&PieceLayout::standard_start(), false);
    assert!(matches!(table.tick(), TickOutcome::Rejected(_)));
    assert_eq!(table.plies(), 3);
}

// ============================================================================
// Special Moves
// ============================================================================

#[test]
fn test_castling_kingside() {
    //! King and rook lifted, then both placed: one castling move
    let mut table = Table::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
    let king = *table.current().layout.get(Square::E1).unwrap();
    let rook = *table.current().layout.get(Square::H1).unwrap();

    assert!(matches!(table.lift(Square::E1), TickOutcome::Rejected(_)));
    assert!(matches!(
        table.place(Square::G1, Color::White),
        TickOutcome::Rejected(Rejection::Unexpected { .. })
    ));
    assert!(matches!(table.lift(Square::H1), TickOutcome::Rejected(_)));
    assert_eq!(
        table.place(Square::F1, Color::White),
        TickOutcome::Committed { uci: "e1g1".to_string() }
    );

    let layout = &table.current().layout;
    assert_eq!(layout.get(Square::G1).unwrap().id, king.id);
    assert_eq!(layout.get(Square::F1).unwrap().id, rook.id);
    assert_eq!(table.current().last_move.as_ref().unwrap().san, "O-O");
}

#[test]
fn test_rook_first_castling_replaces_rook_move() {
    //! Rook h1-f1 commits on its own; the king landing on g1 turns it into O-O
    let mut table = Table::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
    let king = *table.current().layout.get(Square::E1).unwrap();
    let rook = *table.current().layout.get(Square::H1).unwrap();

    table.commit(Square::H1, Square::F1);
    assert_eq!(table.plies(), 2);
    assert_eq!(table.current().player_to_move, Color::Black);
    table.drain();

    assert_eq!(
        table.slide(Square::E1, Square::G1),
        TickOutcome::Replaced { uci: "e1g1".to_string() }
    );
    assert_eq!(table.plies(), 2);

    let state = table.current();
    let record = state.last_move.as_ref().unwrap();
    assert!(record.is_castling);
    assert_eq!(record.san, "O-O");
    assert_eq!(state.layout.get(Square::G1).unwrap().id, king.id);
    assert_eq!(state.layout.get(Square::F1).unwrap().id, rook.id);
    assert_eq!(state.player_to_move, Color::Black);
    assert!(table.notifications().is_empty());
}

#[test]
fn test_castling_queenside_black() {
    let mut table = Table::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1");
    table.frame.set_on(Square::E8, false, None);
    table.frame.set_on(Square::A8, false, None);
    table.frame.set_on(Square::C8, false, Some(Color::Black));
    table.frame.set_on(Square::D8, false, Some(Color::Black));
    assert_eq!(table.tick(), TickOutcome::Committed { uci: "e8c8".to_string() });
}

#[test]
fn test_en_passant_capture() {
    //! exd6 e.p.: mover and victim lifted, mover lands behind the victim
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::A7, Square::A6);
    table.commit(Square::E4, Square::E5);
    table.commit(Square::D7, Square::D5);

    assert!(matches!(table.lift(Square::E5), TickOutcome::Rejected(_)));
    assert!(matches!(table.lift(Square::D5), TickOutcome::Rejected(_)));
    assert_eq!(
        table.place(Square::D6, Color::White),
        TickOutcome::Committed { uci: "e5d6".to_string() }
    );

    let state = table.current();
    assert!(state.layout.get(Square::D5).is_none());
    assert!(state.last_move.as_ref().unwrap().is_en_passant);
    assert!(state.layout.matches_board(state.rules_board.board()));
}

#[test]
fn test_en_passant_shape_without_capture_rejected() {
    let mut table = Table::started(false);
    table.commit(Square::E2, Square::E4);
    table.commit(Square::A7, Square::A6);
    table.commit(Square::E4, Square::E5);
    table.commit(Square::D7, Square::D5);

    assert!(matches!(
        table.slide(Square::E5, Square::D6),
        TickOutcome::Rejected(Rejection::Unexpected { .. })
    ));
    assert_eq!(table.plies(), 5);
}

#[test]
fn test_promotion_to_queen() {
    //! e7-e8 replaces the pawn with a new white queen; move is e7e8q
    let mut table = Table::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1");
    let pawn = *table.current().layout.get(Square::E7).unwrap();

    assert_eq!(
        table.slide(Square::E7, Square::E8),
        TickOutcome::Committed { uci: "e7e8q".to_string() }
    );

    let queen = *table.current().layout.get(Square::E8).unwrap();
    assert_eq!(queen.role, Role::Queen);
    assert_eq!(queen.color, Color::White);
    assert_ne!(queen.id, pawn.id);
    assert!(table.current().last_move.as_ref().unwrap().is_promotion);
}

// ============================================================================
// Game Over, Replay and Export
// ============================================================================

fn fools_mate() -> Table {
    let mut table = Table::started(false);
    table.commit(Square::F2, Square::F3);
    table.commit(Square::E7, Square::E5);
    table.commit(Square::G2, Square::G4);
    table.commit(Square::D8, Square::H4);
    table
}

#[test]
fn test_checkmate_ends_game() {
    let table = fools_mate();
    assert_eq!(table.manager.phase(), GamePhase::Over);
    assert_eq!(table.manager.outcome(), GameOverState::BlackWon);

    let notes = table.notifications();
    assert!(notes.contains(&(NotifyKind::GameOver, "Black wins by checkmate!".to_string())));
}

#[test]
fn test_no_commits_after_game_over() {
    let mut table = fools_mate();
    assert_eq!(table.slide(Square::E1, Square::F2), TickOutcome::GameOver);
    assert_eq!(table.plies(), 5);
}

#[test]
fn test_new_game_after_game_over() {
    //! Resetting the pieces to the start position begins a fresh game
    let mut table = fools_mate();
    table.frame = SensorFrame::from_layout(&PieceLayout::standard_start(), false);
    assert_eq!(table.tick(), TickOutcome::NewGame { flipped: false });
    assert_eq!(table.plies(), 1);
    assert_eq!(table.manager.outcome(), GameOverState::Playing);
}

#[test]
fn test_replay_request_restarts_on_standing_start() {
    //! A board already in the starting layout is picked up after replay
    let mut table = Table::started(false);
    assert_eq!(table.tick(), TickOutcome::Unchanged);

    table.manager.request_new_game();
    assert_eq!(table.tick(), TickOutcome::NewGame { flipped: false });
}

#[test]
fn test_pgn_of_finished_game() {
    let table = fools_mate();
    let headers = PgnHeaders {
        date: chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        ..PgnHeaders::default()
    };
    let pgn = table.manager.pgn(&headers).unwrap();

    assert!(pgn.contains("[Result \"0-1\"]"));
    assert!(pgn.contains("[Date \"2025.01.02\"]"));
    assert!(pgn.trim_end().ends_with("1. f3 e5 2. g4 Qh4# 0-1"));
}

#[test]
fn test_fen_tracks_current_state() {
    let mut table = Table::started(false);
    table.commit(Square::G1, Square::F3);
    assert_eq!(
        table.manager.fen().unwrap(),
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
    );
}

#[test]
fn test_review_walks_committed_states() {
    let table = fools_mate();
    let mut review = table.manager.review().unwrap();
    assert_eq!(review.len(), 5);

    let start = review.first().layout.clone();
    assert!(start.matches_board(BoardState::standard_start().rules_board.board()));
    assert_eq!(review.next().last_move.as_ref().unwrap().san, "f3");
    review.last();
    review.next();
    assert_eq!(review.index(), 4);
}
