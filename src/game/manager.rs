//! Board state manager - the per-tick inference state machine
//!
//! Owns committed history and runs, once per tick:
//!
//! ```text
//! fingerprint unchanged? ── yes ──▶ Unchanged
//!        │ no
//! no game active? ── start pattern ──▶ NewGame (reseed history, set orientation)
//!        │ game active
//! diff vs current ── empty ──▶ AtRest
//!        │ classify → legal? ──▶ Committed
//!        │ no
//! diff vs previous ── empty ──▶ RolledBack
//!        │ classify → legal? ──▶ Replaced (pop, then commit)
//!        │ no
//! Rejected (best-effort staging layout + notification, history untouched)
//! ```
//!
//! Every per-tick failure is local: nothing here returns an error or stops
//! the polling loop. The manager is meant to have exactly one owner (the
//! tick task); display output leaves through [`RenderSender`].

use crate::display::{NotifyKind, RenderCommand, RenderSender};
use crate::game::cell::{Fingerprint, SensorFrame};
use crate::game::classifier::{classify, AmbiguityReason, MoveShape};
use crate::game::components::GamePhase;
use crate::game::diff::{diff, DiffShape};
use crate::game::error::{GameError, GameResult};
use crate::game::export::{self, PgnHeaders};
use crate::game::layout::PieceLayout;
use crate::game::resources::{BoardHistory, GameOverState, GameReview};
use crate::game::rules::BoardState;
use crate::game::types::color_name;
use tracing::{debug, info, trace, warn};

/// Why the board could not be explained by a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Candidate existed but the rules engine refused it
    Illegal { uci: String, error: GameError },
    /// No candidate could be formed
    Unexpected { shape: DiffShape, reason: AmbiguityReason },
}

impl Rejection {
    fn notify_kind(&self) -> NotifyKind {
        match self {
            Rejection::Illegal { .. } => NotifyKind::Illegal,
            Rejection::Unexpected { .. } => NotifyKind::Unexpected,
        }
    }

    fn message(&self) -> String {
        match self {
            Rejection::Illegal { uci, .. } => format!("Illegal move {}", uci),
            Rejection::Unexpected { reason, .. } => format!("Unexpected board state: {}", reason),
        }
    }
}

/// What one tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Same fingerprint as the last analysed frame
    Unchanged,
    /// No game yet and the board is not in a starting layout
    AwaitingSetup,
    NewGame { flipped: bool },
    /// Board matches the current committed state
    AtRest,
    Committed { uci: String },
    /// Board matches the previous state; current state popped
    RolledBack,
    /// Previous state popped and a different move committed in its place
    Replaced { uci: String },
    Rejected(Rejection),
    /// Game finished; frames are ignored until a new game is set up
    GameOver,
}

/// Result of comparing a frame against one committed state
enum Evaluation {
    AtRest,
    Legal(BoardState),
    Rejected {
        staging: PieceLayout,
        rejection: Rejection,
    },
}

fn evaluate(reference: &BoardState, frame: &SensorFrame, flipped: bool) -> Evaluation {
    let board_diff = diff(frame, &reference.layout, flipped);
    let shape = classify(&board_diff, reference);
    debug!("[BOARD] Diff {} classified as {:?}", board_diff.shape(), shape);

    if shape == MoveShape::None {
        return Evaluation::AtRest;
    }

    let mut staging = reference.layout.clone();
    match shape.candidate() {
        Some(candidate) => match reference.apply(&candidate) {
            Ok(next) => Evaluation::Legal(next),
            Err(error) => {
                candidate.apply_to(&mut staging);
                Evaluation::Rejected {
                    staging,
                    rejection: Rejection::Illegal {
                        uci: candidate.uci(),
                        error,
                    },
                }
            }
        },
        None => {
            for missing in &board_diff.missing {
                staging.remove(missing.square);
            }
            let rejection = match shape {
                MoveShape::Ambiguous { shape, reason } => Rejection::Unexpected { shape, reason },
                _ => Rejection::Unexpected {
                    shape: board_diff.shape(),
                    reason: AmbiguityReason::UnknownShape,
                },
            };
            Evaluation::Rejected { staging, rejection }
        }
    }
}

pub struct BoardStateManager {
    history: BoardHistory,
    phase: GamePhase,
    outcome: GameOverState,
    flipped: bool,
    last_fingerprint: Option<Fingerprint>,
    start_patterns: [Fingerprint; 2],
    render: RenderSender,
}

impl BoardStateManager {
    pub fn new(render: RenderSender) -> Self {
        let start = PieceLayout::standard_start();
        Self {
            history: BoardHistory::default(),
            phase: GamePhase::Setup,
            outcome: GameOverState::Playing,
            flipped: false,
            last_fingerprint: None,
            start_patterns: [
                SensorFrame::from_layout(&start, false).fingerprint(),
                SensorFrame::from_layout(&start, true).fingerprint(),
            ],
            render,
        }
    }

    /// Analyse one frame
    pub fn tick(&mut self, frame: &SensorFrame) -> TickOutcome {
        let fingerprint = frame.fingerprint();
        if self.last_fingerprint == Some(fingerprint) {
            trace!("[BOARD] Fingerprint unchanged");
            return TickOutcome::Unchanged;
        }
        self.last_fingerprint = Some(fingerprint);

        if self.phase.accepts_new_game() {
            if let Some(flipped) = self.start_orientation(&fingerprint) {
                self.start_game(BoardState::standard_start(), flipped);
                return TickOutcome::NewGame { flipped };
            }
            return match self.phase {
                GamePhase::Over => TickOutcome::GameOver,
                _ => TickOutcome::AwaitingSetup,
            };
        }

        self.run_commit_protocol(frame)
    }

    fn start_orientation(&self, fingerprint: &Fingerprint) -> Option<bool> {
        if *fingerprint == self.start_patterns[0] {
            Some(false)
        } else if *fingerprint == self.start_patterns[1] {
            Some(true)
        } else {
            None
        }
    }

    /// Begin a game from `root` in the given orientation
    ///
    /// Used by new-game detection with the standard start; also lets a game
    /// resume from an arbitrary position.
    pub fn start_game(&mut self, root: BoardState, flipped: bool) {
        info!(
            "[BOARD] New game ({}), {} to move",
            if flipped { "flipped" } else { "normal orientation" },
            color_name(root.player_to_move)
        );
        self.flipped = flipped;
        self.phase = GamePhase::Playing;
        self.outcome = GameOverState::Playing;
        self.render.send(RenderCommand::ShowLayout(root.layout.clone()));
        self.render.send(RenderCommand::SetPlayer(root.player_to_move));
        self.render.notify(NotifyKind::NewGame, "New game started");
        self.history.reseed(root);
    }

    fn run_commit_protocol(&mut self, frame: &SensorFrame) -> TickOutcome {
        let Some(current) = self.history.current() else {
            warn!("[BOARD] Playing with empty history; waiting for setup");
            self.phase = GamePhase::Setup;
            return TickOutcome::AwaitingSetup;
        };

        let (staging, rejection) = match evaluate(current, frame, self.flipped) {
            Evaluation::AtRest => {
                let layout = current.layout.clone();
                self.render.send(RenderCommand::ShowLayout(layout));
                return TickOutcome::AtRest;
            }
            Evaluation::Legal(next) => {
                let uci = self.commit(next);
                return TickOutcome::Committed { uci };
            }
            Evaluation::Rejected { staging, rejection } => (staging, rejection),
        };

        match self.history.previous().map(|s| evaluate(s, frame, self.flipped)) {
            Some(Evaluation::AtRest) => {
                self.rollback();
                return TickOutcome::RolledBack;
            }
            Some(Evaluation::Legal(next)) => {
                self.history.pop();
                let uci = self.commit(next);
                info!("[BOARD] Replaced last move with {}", uci);
                return TickOutcome::Replaced { uci };
            }
            Some(Evaluation::Rejected { .. }) | None => {}
        }

        warn!("[BOARD] {}", rejection.message());
        self.render.send(RenderCommand::ShowLayout(staging));
        self.render.notify(rejection.notify_kind(), rejection.message());
        TickOutcome::Rejected(rejection)
    }

    /// Push `next` and report it; returns the committed move
    fn commit(&mut self, next: BoardState) -> String {
        let (uci, san) = next
            .last_move
            .as_ref()
            .map(|r| (r.uci.clone(), r.san.clone()))
            .unwrap_or_default();
        let outcome = next.outcome();
        let player = next.player_to_move;

        self.render.send(RenderCommand::ShowLayout(next.layout.clone()));
        self.render.send(RenderCommand::SetPlayer(player));
        self.history.push(next);
        info!(
            "[BOARD] Committed {} ({}), ply {}, {} to move",
            uci,
            san,
            self.history.len() - 1,
            color_name(player)
        );

        if outcome.is_game_over() {
            info!("[BOARD] Game over: {}", outcome.message());
            self.phase = GamePhase::Over;
            self.outcome = outcome;
            self.render.notify(NotifyKind::GameOver, outcome.message());
        }
        uci
    }

    fn rollback(&mut self) {
        self.history.pop();
        if let Some(previous) = self.history.current() {
            info!(
                "[BOARD] Rolled back to ply {}, {} to move",
                self.history.len() - 1,
                color_name(previous.player_to_move)
            );
            self.render.send(RenderCommand::ShowLayout(previous.layout.clone()));
            self.render.send(RenderCommand::SetPlayer(previous.player_to_move));
            self.render.notify(NotifyKind::TakeBack, "Move taken back");
        }
    }

    /// End the current game; the next starting layout seeds a new one
    ///
    /// Also forgets the last fingerprint so a board already standing in the
    /// starting layout is picked up on the next tick.
    pub fn request_new_game(&mut self) {
        info!("[BOARD] New game requested");
        self.phase = GamePhase::Setup;
        self.outcome = GameOverState::Playing;
        self.last_fingerprint = None;
        self.render.notify(NotifyKind::Info, "Set up the pieces to start a new game");
    }

    /// Start reviewing committed history
    pub fn review(&self) -> GameResult<GameReview> {
        GameReview::new(&self.history)
    }

    pub fn pgn(&self, headers: &PgnHeaders) -> GameResult<String> {
        export::pgn(&self.history, self.outcome, headers).ok_or(GameError::NoActiveGame)
    }

    pub fn fen(&self) -> GameResult<String> {
        export::fen(&self.history).ok_or(GameError::NoActiveGame)
    }

    pub fn history(&self) -> &BoardHistory {
        &self.history
    }

    pub fn current(&self) -> Option<&BoardState> {
        self.history.current()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> GameOverState {
        self.outcome
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Re-send the current layout and side to move (e.g. after review)
    pub fn redraw(&self) {
        if let Some(current) = self.history.current() {
            self.render.send(RenderCommand::ShowLayout(current.layout.clone()));
            self.render.send(RenderCommand::SetPlayer(current.player_to_move));
        }
    }
}
