//! PGN and FEN export of committed history
//!
//! PGN uses the Seven Tag Roster. Games that did not start from the standard
//! position also carry `SetUp`/`FEN` tags so the movetext replays correctly.

use crate::game::resources::{BoardHistory, GameOverState};
use chrono::{Local, NaiveDate};
use shakmaty::Color;

const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// PGN header values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: NaiveDate,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "MagChess board".to_string(),
            date: Local::now().date_naive(),
            round: "-".to_string(),
            white: "White".to_string(),
            black: "Black".to_string(),
        }
    }
}

/// Render `history` as a PGN game
///
/// Returns `None` when there is nothing to export.
pub fn pgn(history: &BoardHistory, outcome: GameOverState, headers: &PgnHeaders) -> Option<String> {
    let root = history.get(0)?;
    let result = outcome.pgn_result();
    let mut out = String::new();

    let tags = [
        ("Event", headers.event.clone()),
        ("Site", headers.site.clone()),
        ("Date", headers.date.format("%Y.%m.%d").to_string()),
        ("Round", headers.round.clone()),
        ("White", headers.white.clone()),
        ("Black", headers.black.clone()),
        ("Result", result.to_string()),
    ];
    for (name, value) in tags {
        out.push_str(&format!("[{} \"{}\"]\n", name, value));
    }
    let root_fen = root.fen();
    if root_fen != STANDARD_FEN {
        out.push_str("[SetUp \"1\"]\n");
        out.push_str(&format!("[FEN \"{}\"]\n", root_fen));
    }
    out.push('\n');

    let mut tokens = Vec::new();
    for (before, after) in history.iter().zip(history.iter().skip(1)) {
        let Some(record) = &after.last_move else {
            continue;
        };
        match before.player_to_move {
            Color::White => tokens.push(format!("{}. {}", before.fullmoves(), record.san)),
            Color::Black if tokens.is_empty() => {
                tokens.push(format!("{}... {}", before.fullmoves(), record.san))
            }
            Color::Black => tokens.push(record.san.clone()),
        }
    }
    tokens.push(result.to_string());
    out.push_str(&tokens.join(" "));
    out.push('\n');

    Some(out)
}

/// FEN of the current committed state
pub fn fen(history: &BoardHistory) -> Option<String> {
    history.current().map(|state| state.fen())
}
