//! Display boundary
//!
//! The board state manager never calls into rendering. It emits
//! [`RenderCommand`]s on a `crossbeam-channel`; a display thread drains the
//! channel into a [`DisplaySink`]. Sends are fire-and-forget: a missing or
//! slow display never holds up a tick.

pub mod console;

pub use console::ConsoleDisplay;

use crate::game::layout::PieceLayout;
use crossbeam_channel::{Receiver, Sender};
use shakmaty::Color;
use tracing::{debug, trace};

/// Category of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyKind {
    /// Starting layout recognized, history reseeded
    NewGame,
    /// Board returned to the previous committed state
    TakeBack,
    /// Structurally valid move rejected by the rules engine
    Illegal,
    /// Board matches no known move pattern
    Unexpected,
    /// Terminal outcome reached
    GameOver,
    /// Review navigation, exports and other status lines
    Info,
}

impl NotifyKind {
    pub fn tag(self) -> &'static str {
        match self {
            NotifyKind::NewGame => "NEW GAME",
            NotifyKind::TakeBack => "TAKE BACK",
            NotifyKind::Illegal => "ILLEGAL",
            NotifyKind::Unexpected => "UNEXPECTED",
            NotifyKind::GameOver => "GAME OVER",
            NotifyKind::Info => "INFO",
        }
    }
}

/// One instruction for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    ShowLayout(PieceLayout),
    Notify { kind: NotifyKind, message: String },
    SetPlayer(Color),
}

/// Something that can show the believed board
pub trait DisplaySink {
    fn show_layout(&mut self, layout: &PieceLayout);
    fn notify(&mut self, kind: NotifyKind, message: &str);
    fn set_current_player(&mut self, color: Color);
}

impl RenderCommand {
    /// Forward this command to `sink`
    pub fn dispatch<S: DisplaySink + ?Sized>(&self, sink: &mut S) {
        match self {
            RenderCommand::ShowLayout(layout) => sink.show_layout(layout),
            RenderCommand::Notify { kind, message } => sink.notify(*kind, message),
            RenderCommand::SetPlayer(color) => sink.set_current_player(*color),
        }
    }
}

/// Sending half held by the board state manager
#[derive(Debug, Clone)]
pub struct RenderSender {
    tx: Option<Sender<RenderCommand>>,
}

impl RenderSender {
    pub fn new(tx: Sender<RenderCommand>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sender that drops every command (headless runs, benchmarks)
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, command: RenderCommand) {
        if let Some(tx) = &self.tx {
            if tx.send(command).is_err() {
                trace!("[BOARD] Display gone, render command dropped");
            }
        }
    }

    pub fn notify(&self, kind: NotifyKind, message: impl Into<String>) {
        self.send(RenderCommand::Notify {
            kind,
            message: message.into(),
        });
    }
}

/// Drain `rx` into `sink` until every sender is dropped
///
/// Meant to run on its own thread.
pub fn run_display<S: DisplaySink>(rx: Receiver<RenderCommand>, mut sink: S) -> S {
    debug!("[RUNTIME] Display loop started");
    for command in rx.iter() {
        command.dispatch(&mut sink);
    }
    debug!("[RUNTIME] Display loop stopped");
    sink
}
