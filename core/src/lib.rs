//! Game-state engine for a single-player Minesweeper: deferred mine placement, flood-fill and
//! chorded reveal, win/loss detection, and snapshot-based undo.
//!
//! The engine takes intents (reveal, flag, chord, undo, restart) and exposes the resulting
//! state; input handling and drawing belong to the caller. See [`BoardView`] for a rendering
//! projection.

pub use cell::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use grid::*;
pub use history::*;
pub use minefield::*;
pub use reveal::*;
pub use types::*;
pub use view::*;

mod cell;
mod config;
mod error;
mod game;
mod grid;
mod history;
mod minefield;
mod reveal;
pub mod save;
mod types;
mod view;

/// Builds a fresh game, failing on invalid dimensions or mine count.
pub fn new_game(rows: Coord, columns: Coord, mines: CellCount) -> Result<GameState> {
    Ok(GameState::new(GameConfig::new(rows, columns, mines)?))
}
