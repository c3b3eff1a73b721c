//! Committed board state

use crate::game::classifier::CandidateMove;
use crate::game::components::MoveRecord;
use crate::game::error::{GameError, GameResult};
use crate::game::layout::PieceLayout;
use crate::game::resources::GameOverState;
use crate::game::rules::engine;
use shakmaty::{Chess, Color, Position};

/// Immutable snapshot accepted as ground truth
///
/// Never mutated after construction; the next state is a new value built by
/// [`BoardState::apply`].
#[derive(Debug, Clone)]
pub struct BoardState {
    pub rules_board: Chess,
    pub layout: PieceLayout,
    pub player_to_move: Color,
    /// Move that produced this state; `None` for a root state
    pub last_move: Option<MoveRecord>,
}

impl BoardState {
    /// Standard starting position with freshly spawned pieces
    pub fn standard_start() -> Self {
        Self::root(Chess::default())
    }

    /// Root state for an arbitrary legal position
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        engine::position_from_fen(fen).map(Self::root)
    }

    fn root(rules_board: Chess) -> Self {
        let layout = PieceLayout::from_board(rules_board.board());
        let player_to_move = rules_board.turn();
        Self {
            rules_board,
            layout,
            player_to_move,
            last_move: None,
        }
    }

    /// Validate `candidate` and build the resulting state
    ///
    /// All-or-nothing: the rules engine must accept the move, and the
    /// staging layout with the move applied must agree square for square
    /// with the resulting rules board. `self` is never modified.
    pub fn apply(&self, candidate: &CandidateMove) -> GameResult<BoardState> {
        let uci = candidate.uci();
        let m = engine::legal_move(&self.rules_board, &uci)?;
        let san = engine::san(&self.rules_board, &m);
        let rules_board = engine::apply(&self.rules_board, &m)?;

        let mut staging = self.layout.clone();
        candidate.apply_to(&mut staging);
        if let Some(square) = staging.first_mismatch(rules_board.board()) {
            return Err(GameError::LayoutMismatch { uci, square });
        }

        let record = MoveRecord {
            uci,
            san,
            is_capture: m.is_capture(),
            is_castling: m.is_castle(),
            is_en_passant: m.is_en_passant(),
            is_promotion: m.is_promotion(),
        };
        let player_to_move = rules_board.turn();
        Ok(BoardState {
            rules_board,
            layout: staging,
            player_to_move,
            last_move: Some(record),
        })
    }

    pub fn outcome(&self) -> GameOverState {
        engine::outcome(&self.rules_board)
    }

    pub fn fen(&self) -> String {
        engine::fen(&self.rules_board)
    }

    /// Full move number of the position (starts at 1)
    pub fn fullmoves(&self) -> u32 {
        self.rules_board.fullmoves().get()
    }
}
