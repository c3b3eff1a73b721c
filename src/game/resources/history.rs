//! Committed board state history

use crate::game::rules::BoardState;

/// Committed states, oldest first; the last element is current
///
/// Only the last two entries are ever compared against live sensor data.
#[derive(Debug, Clone, Default)]
pub struct BoardHistory {
    states: Vec<BoardState>,
}

impl BoardHistory {
    /// Drop everything and start over from `root`
    pub fn reseed(&mut self, root: BoardState) {
        self.states.clear();
        self.states.push(root);
    }

    pub fn push(&mut self, state: BoardState) {
        self.states.push(state);
    }

    /// Remove and return the current state
    pub fn pop(&mut self) -> Option<BoardState> {
        self.states.pop()
    }

    /// The current committed state
    pub fn current(&self) -> Option<&BoardState> {
        self.states.last()
    }

    /// The state before the current one
    pub fn previous(&self) -> Option<&BoardState> {
        self.states.len().checked_sub(2).and_then(|i| self.states.get(i))
    }

    /// Whether a rollback target exists
    pub fn can_undo(&self) -> bool {
        self.states.len() >= 2
    }

    pub fn get(&self, index: usize) -> Option<&BoardState> {
        self.states.get(index)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoardState> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[BoardState] {
        &self.states
    }
}
