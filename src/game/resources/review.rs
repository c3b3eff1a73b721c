//! Game review cursor
//!
//! Steps through a snapshot of committed history. The cursor is clamped at
//! both ends: `previous` on the first ply and `next` on the last are no-ops.
//! Reviewing never touches the live history.

use crate::game::error::{GameError, GameResult};
use crate::game::resources::BoardHistory;
use crate::game::rules::BoardState;

#[derive(Debug, Clone)]
pub struct GameReview {
    states: Vec<BoardState>,
    index: usize,
}

impl GameReview {
    /// Start reviewing at the latest state
    ///
    /// Fails with [`GameError::NoActiveGame`] when nothing has been committed.
    pub fn new(history: &BoardHistory) -> GameResult<Self> {
        if history.is_empty() {
            return Err(GameError::NoActiveGame);
        }
        let states = history.as_slice().to_vec();
        let index = states.len() - 1;
        Ok(Self { states, index })
    }

    /// State under the cursor
    pub fn current(&self) -> &BoardState {
        &self.states[self.index]
    }

    pub fn first(&mut self) -> &BoardState {
        self.seek(0)
    }

    pub fn previous(&mut self) -> &BoardState {
        self.seek(self.index.saturating_sub(1))
    }

    pub fn next(&mut self) -> &BoardState {
        self.seek(self.index + 1)
    }

    pub fn last(&mut self) -> &BoardState {
        self.seek(self.states.len() - 1)
    }

    fn seek(&mut self, index: usize) -> &BoardState {
        self.index = index.min(self.states.len() - 1);
        self.current()
    }

    /// Ply index under the cursor (0 is the starting position)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Status line such as `"ply 3/10: Nf3"`
    pub fn describe(&self) -> String {
        let last = self.states.len() - 1;
        match &self.current().last_move {
            Some(record) => format!("ply {}/{}: {}", self.index, last, record.san),
            None => format!("ply {}/{}: start", self.index, last),
        }
    }
}
