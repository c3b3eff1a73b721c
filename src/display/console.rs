//! Text-mode display sink
//!
//! Prints the believed layout as an 8x8 board (rank 8 at the top, or rank 1
//! when viewing from black's side), notifications as tagged lines, and
//! the side to move.

use crate::display::{DisplaySink, NotifyKind};
use crate::game::layout::PieceLayout;
use crate::game::types::color_name;
use shakmaty::{Color, Square};
use std::io::{self, Write};
use tracing::warn;

pub struct ConsoleDisplay<W: Write> {
    out: W,
    from_black: bool,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            from_black: false,
        }
    }

    /// Draw boards from black's side
    pub fn with_black_at_bottom(mut self, from_black: bool) -> Self {
        self.from_black = from_black;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_board(&mut self, layout: &PieceLayout) -> io::Result<()> {
        let ranks: Vec<u32> = if self.from_black {
            (0..8).collect()
        } else {
            (0..8).rev().collect()
        };
        let files: Vec<u32> = if self.from_black {
            (0..8).rev().collect()
        } else {
            (0..8).collect()
        };

        writeln!(self.out)?;
        for &rank in &ranks {
            write!(self.out, "{} ", rank + 1)?;
            for &file in &files {
                let symbol = layout
                    .get(Square::new(rank * 8 + file))
                    .map_or('.', |p| p.symbol());
                write!(self.out, " {}", symbol)?;
            }
            writeln!(self.out)?;
        }
        write!(self.out, "  ")?;
        for &file in &files {
            write!(self.out, " {}", (b'a' + file as u8) as char)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            warn!("[RUNTIME] Console write failed: {}", e);
        }
    }
}

impl<W: Write> DisplaySink for ConsoleDisplay<W> {
    fn show_layout(&mut self, layout: &PieceLayout) {
        let result = self.write_board(layout);
        Self::report(result);
    }

    fn notify(&mut self, kind: NotifyKind, message: &str) {
        let result = writeln!(self.out, "[{}] {}", kind.tag(), message).and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn set_current_player(&mut self, color: Color) {
        let result = writeln!(self.out, "{} to move", color_name(color)).and_then(|_| self.out.flush());
        Self::report(result);
    }
}
