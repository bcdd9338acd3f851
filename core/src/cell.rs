use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

/// Cell as stored by the engine.
///
/// `Revealed` carries the adjacent mine count and only ever holds a safe cell. `Mine` is a
/// mine made visible after the game was lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl Cell {
    pub const fn state(self) -> CellState {
        match self {
            Self::Hidden => CellState::Hidden,
            Self::Flagged => CellState::Flagged,
            Self::Revealed(_) | Self::Mine => CellState::Revealed,
        }
    }

    pub const fn adjacent_mine_count(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Mine)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
