use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable capture of the observable game state, taken before a mutating intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) board: BoardState,
    pub(crate) status: GameStatus,
}

impl Snapshot {
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }
}

/// Unbounded LIFO stack of snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryManager {
    entries: Vec<Snapshot>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}
