use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board dimensions must be at least 1x1")]
    InvalidDimensions,
    #[error("Too many mines: requested {mines} but only {capacity} cells are free")]
    TooManyMines { mines: CellCount, capacity: CellCount },
    #[error("Mines were already placed for this game")]
    MinesAlreadyPlaced,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Mine layout holds {actual} mines but {expected} were configured")]
    MineCountMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Board counters or triggered mine disagree with its cells")]
    InconsistentBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure to load or store a saved game.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Malformed save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent save data: {0}")]
    Invalid(#[from] GameError),
}
