//! Console commands for the simulated board
//!
//! Squares name sensor positions as seen from the operator's side
//! (`a1` is the near-left sensor), regardless of game orientation.

use magchess_sensors::{Coords, SimulatedSquare};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    First,
    Previous,
    Next,
    Last,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Remove whatever stands on a sensor
    Lift(Coords),
    /// Put a piece of a color on a sensor
    Place(Coords, SimulatedSquare),
    /// Advance a sensor through Empty → White → Black
    Cycle(Coords),
    /// Carry the piece on one sensor to another
    Move(Coords, Coords),
    /// Reset the simulated board to a starting layout
    Start,
    /// Remove every piece
    Clear,
    Pgn,
    Fen,
    /// Print the detected-color grid
    Sensors,
    Review(ReviewStep),
    /// End the current game so the next starting layout begins a new one
    Replay,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  lift <sq>                 remove the piece on a square
  place <sq> white|black    put a piece on a square
  cycle <sq>                empty -> white -> black -> empty
  move <from> <to>          carry a piece between squares
  start | clear             reset to a starting layout / empty board
  sensors                   show detected colors
  pgn | fen                 export the game
  review first|prev|next|last|exit
  replay                    end the game; set up pieces for a new one
  quit";

fn square(arg: Option<&str>, usage: &'static str) -> Result<Coords, CommandError> {
    let arg = arg.ok_or(CommandError::Usage(usage))?;
    Coords::from_algebraic(arg).map_err(|_| CommandError::InvalidSquare(arg.to_string()))
}

impl FromStr for ConsoleCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "lift" => ConsoleCommand::Lift(square(words.next(), "lift <sq>")?),
            "cycle" => ConsoleCommand::Cycle(square(words.next(), "cycle <sq>")?),
            "place" => {
                const USAGE: &str = "place <sq> white|black";
                let coords = square(words.next(), USAGE)?;
                let state = match words.next().map(str::to_ascii_lowercase).as_deref() {
                    Some("white" | "w") => SimulatedSquare::White,
                    Some("black" | "b") => SimulatedSquare::Black,
                    _ => return Err(CommandError::Usage(USAGE)),
                };
                ConsoleCommand::Place(coords, state)
            }
            "move" => {
                const USAGE: &str = "move <from> <to>";
                ConsoleCommand::Move(square(words.next(), USAGE)?, square(words.next(), USAGE)?)
            }
            "start" => ConsoleCommand::Start,
            "clear" => ConsoleCommand::Clear,
            "pgn" => ConsoleCommand::Pgn,
            "fen" => ConsoleCommand::Fen,
            "sensors" => ConsoleCommand::Sensors,
            "review" => {
                let step = match words.next() {
                    Some("first") => ReviewStep::First,
                    Some("prev" | "previous") => ReviewStep::Previous,
                    Some("next") | None => ReviewStep::Next,
                    Some("last") => ReviewStep::Last,
                    Some("exit") => ReviewStep::Exit,
                    Some(_) => return Err(CommandError::Usage("review first|prev|next|last|exit")),
                };
                ConsoleCommand::Review(step)
            }
            "replay" => ConsoleCommand::Replay,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
