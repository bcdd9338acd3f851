use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// How a single cell should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent mine count, 0 is drawn blank.
    Open(u8),
    Mine,
    /// The mine whose reveal lost the game.
    TriggeredMine,
}

impl TileView {
    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flagged => 'F',
            Self::Open(0) => ' ',
            Self::Open(count) => (b'0' + count) as char,
            Self::Mine => '*',
            Self::TriggeredMine => 'X',
        }
    }
}

/// Rendering projection of a game, computed on demand and never stored by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub status: GameStatus,
    pub mines_left: isize,
    pub tiles: Array2<TileView>,
    pub cleared: bool,
    total_mines: CellCount,
}

impl BoardView {
    pub fn from_game(game: &GameState) -> Self {
        let size = game.size();
        let board = game.board();
        let mut tiles = Array2::from_elem(size.to_nd_index(), TileView::Hidden);

        for coords in board.grid().coords() {
            tiles[coords.to_nd_index()] = match board.grid()[coords] {
                Cell::Hidden => TileView::Hidden,
                Cell::Flagged => TileView::Flagged,
                Cell::Revealed(count) => TileView::Open(count),
                Cell::Mine if board.triggered_mine() == Some(coords) => TileView::TriggeredMine,
                Cell::Mine => TileView::Mine,
            };
        }

        Self {
            size,
            status: game.status(),
            mines_left: game.mines_left(),
            tiles,
            cleared: board.revealed_count() == game.config().safe_cells(),
            total_mines: game.total_mines(),
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<TileView> {
        self.tiles.get(coords.to_nd_index()).copied()
    }

    /// Counter shown above the board: the mine total, or "Cleared" once every safe cell is open.
    pub fn header(&self) -> String {
        if self.cleared {
            "Cleared".to_owned()
        } else {
            self.total_mines.to_string()
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for row in self.tiles.rows() {
            let line: String = row.iter().map(|tile| tile.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
