use core::num::Saturating;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Something observable that happened while an intent was processed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CellRevealed { coords: Coord2, adjacent_mines: u8 },
    MineHit(Coord2),
    GameWon,
    GameLost,
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Summary of a reveal or chord, from the board's point of view.
///
/// `HitMine` and `Won` only say what happened to the cells; the game status is updated by
/// the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// A chord opens several cells; the most significant outcome wins (mine, then win).
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Everything about the board the player can observe, and everything an undo restores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub(crate) grid: Grid,
    pub(crate) revealed_count: Saturating<CellCount>,
    pub(crate) flagged_count: Saturating<CellCount>,
    pub(crate) triggered_mine: Option<Coord2>,
}

impl BoardState {
    pub fn new(size: Coord2) -> Self {
        Self {
            grid: Grid::new(size),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            triggered_mine: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Hidden, unflagged neighbors a chord on `coords` would open, in row-major order.
    ///
    /// Empty unless `coords` is a revealed cell with a non-zero count.
    pub fn chord_candidates(&self, coords: Coord2) -> Vec<Coord2> {
        match self.grid.get(coords) {
            Some(Cell::Revealed(count)) if count > 0 => self
                .grid
                .neighbors(coords)
                .filter(|&pos| self.grid[pos].is_hidden())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether a chord on `coords` would act: revealed, non-zero count, matching flags.
    pub fn is_chord_armed(&self, coords: Coord2) -> bool {
        match self.grid.get(coords) {
            Some(Cell::Revealed(count)) if count > 0 => {
                count == self.grid.count_neighbors(coords, Cell::is_flagged)
            }
            _ => false,
        }
    }

    /// Checks loaded data: counters must match the cells, revealed cells must be safe, and a
    /// triggered mine must be a shown mine.
    pub(crate) fn validate(&self, mines: &MineField) -> Result<()> {
        let mut revealed: CellCount = 0;
        let mut flagged: CellCount = 0;
        for coords in self.grid.coords() {
            match self.grid[coords] {
                Cell::Revealed(_) if mines.is_mine(coords) => {
                    return Err(GameError::InconsistentBoard);
                }
                Cell::Revealed(_) => revealed += 1,
                Cell::Flagged => flagged += 1,
                Cell::Hidden | Cell::Mine => {}
            }
        }

        let triggered_ok = match self.triggered_mine {
            None => true,
            Some(coords) => self.grid.get(coords) == Some(Cell::Mine) && mines.is_mine(coords),
        };

        if revealed != self.revealed_count.0 || flagged != self.flagged_count.0 || !triggered_ok
        {
            return Err(GameError::InconsistentBoard);
        }
        Ok(())
    }
}

/// Cell state transitions: reveal with flood fill, flag toggling, and chorded reveal.
///
/// Borrows the board for the duration of one intent and records what happened in `events`.
#[derive(Debug)]
pub struct RevealEngine<'a> {
    board: &'a mut BoardState,
    mines: &'a MineField,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> RevealEngine<'a> {
    pub fn new(
        board: &'a mut BoardState,
        mines: &'a MineField,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            board,
            mines,
            events,
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.board.grid.in_bounds(coords) {
            return RevealOutcome::NoChange;
        }
        self.reveal_single_cell(coords)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use Cell::*;

        let Some(cell) = self.board.grid.get(coords) else {
            return MarkOutcome::NoChange;
        };

        match cell {
            Hidden => {
                self.board.grid[coords] = Flagged;
                self.board.flagged_count += Saturating(1);
                MarkOutcome::Changed
            }
            Flagged => {
                self.board.grid[coords] = Hidden;
                self.board.flagged_count -= Saturating(1);
                MarkOutcome::Changed
            }
            Revealed(_) | Mine => MarkOutcome::NoChange,
        }
    }

    /// Opens every hidden neighbor once the flags around `coords` match its count.
    ///
    /// Neighbors are processed row-major and processing stops at the first mine.
    pub fn chord_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.board.is_chord_armed(coords) {
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in self.board.chord_candidates(coords) {
            outcome = outcome | self.reveal_single_cell(neighbor);
            if outcome == RevealOutcome::HitMine {
                break;
            }
        }
        outcome
    }

    /// Shows every mine after a loss. Flags on mines are replaced by the mine itself.
    pub fn expose_mines(&mut self) {
        for coords in self.mines.mines() {
            if self.board.grid[coords].is_flagged() {
                self.board.flagged_count -= Saturating(1);
            }
            self.board.grid[coords] = Cell::Mine;
        }
    }

    /// Flags whatever is still hidden after a win; by then only mines are left.
    pub fn flag_remaining(&mut self) {
        for coords in self.board.grid.coords() {
            if self.board.grid[coords].is_hidden() {
                self.board.grid[coords] = Cell::Flagged;
                self.board.flagged_count += Saturating(1);
            }
        }
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.board.grid[coords].is_hidden() {
            return RevealOutcome::NoChange;
        }

        if self.mines.is_mine(coords) {
            log::debug!("Mine hit at {:?}", coords);
            self.board.triggered_mine = Some(coords);
            self.events.push(GameEvent::MineHit(coords));
            return RevealOutcome::HitMine;
        }

        let count = self.open(coords);
        log::debug!("Opened cell at {:?}, mine count: {}", coords, count);

        // work-list flood fill from zero cells
        let mut to_visit: Vec<Coord2> = Vec::new();
        if count == 0 {
            to_visit.extend(self.hidden_neighbors(coords));
        }
        while let Some(visit_coords) = to_visit.pop() {
            if !self.board.grid[visit_coords].is_hidden() {
                continue;
            }
            let count = self.open(visit_coords);
            log::trace!(
                "Flood opened cell at {:?}, mine count: {}",
                visit_coords,
                count
            );
            if count == 0 {
                to_visit.extend(self.hidden_neighbors(visit_coords));
            }
        }

        if self.board.revealed_count.0 == self.safe_cell_count() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Reveals one safe hidden cell, returning its adjacent mine count.
    fn open(&mut self, coords: Coord2) -> u8 {
        let count = self.mines.adjacent_mine_count(coords);
        self.board.grid[coords] = Cell::Revealed(count);
        self.board.revealed_count += Saturating(1);
        self.events.push(GameEvent::CellRevealed {
            coords,
            adjacent_mines: count,
        });
        count
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        self.board
            .grid
            .neighbors(coords)
            .filter(|&pos| self.board.grid[pos].is_hidden())
    }

    fn safe_cell_count(&self) -> CellCount {
        self.mines.total_cells() - self.mines.count()
    }
}
