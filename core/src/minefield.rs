use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine layout of a board. Empty until [`MineField::place`] runs, which happens at most once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineField {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
    placed: bool,
}

impl MineField {
    pub fn new(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mine_count: 0,
            placed: false,
        }
    }

    /// Builds an already placed layout from explicit mine positions.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut field = Self::new(size);

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            field.mine_mask[coords.to_nd_index()] = true;
        }

        field.mine_count = field.count_mask();
        field.placed = true;
        Ok(field)
    }

    /// Randomly places `mines` distinct mines, never on a cell of `safe_zone`.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        mines: CellCount,
        safe_zone: &[Coord2],
        rng: &mut R,
    ) -> Result<()> {
        if self.placed {
            return Err(GameError::MinesAlreadyPlaced);
        }

        let size = self.size();
        let total_cells = self.total_cells();

        // the safe zone is pre-marked so the draw below skips it
        let mut reserved: Vec<Coord2> = Vec::with_capacity(safe_zone.len());
        for &coords in safe_zone {
            if in_bounds(coords, size) && !self.mine_mask[coords.to_nd_index()] {
                self.mine_mask[coords.to_nd_index()] = true;
                reserved.push(coords);
            }
        }

        let mut free_cells = total_cells - reserved.len() as CellCount;
        if mines > free_cells {
            for &coords in &reserved {
                self.mine_mask[coords.to_nd_index()] = false;
            }
            return Err(GameError::TooManyMines {
                mines,
                capacity: free_cells,
            });
        }

        for _ in 0..mines {
            let pick = rng.random_range(0..free_cells);
            if let Some(cell) = self
                .mine_mask
                .iter_mut()
                .filter(|is_mine| !**is_mine)
                .nth(pick.into())
            {
                *cell = true;
            }
            free_cells -= 1;
        }

        for &coords in &reserved {
            self.mine_mask[coords.to_nd_index()] = false;
        }

        self.mine_count = self.count_mask();
        self.placed = true;
        if self.mine_count != mines {
            log::warn!(
                "Placed mine count mismatch, actual: {}, requested: {}",
                self.mine_count,
                mines
            );
        }
        log::debug!(
            "Placed {} mines, safe zone {:?}",
            self.mine_count,
            safe_zone
        );
        Ok(())
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.mine_mask)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn count(&self) -> CellCount {
        self.mine_count
    }

    /// Out-of-bounds coordinates never hold a mine.
    pub fn is_mine(&self, coords: Coord2) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        NeighborIter::new(coords, self.size())
            .filter(|&pos| self.is_mine(pos))
            .count() as u8
    }

    /// Mine coordinates in row-major order.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, column), _)| (row as Coord, column as Coord))
    }

    /// Recounts the mask of a loaded layout against its stored count and the configured one.
    pub(crate) fn validate(&self, configured: CellCount) -> Result<()> {
        let actual = self.count_mask();
        let expected = match self.placed {
            true => configured,
            false => 0,
        };
        if actual != self.mine_count {
            return Err(GameError::MineCountMismatch {
                expected: self.mine_count,
                actual,
            });
        }
        if actual != expected {
            return Err(GameError::MineCountMismatch { expected, actual });
        }
        Ok(())
    }

    fn count_mask(&self) -> CellCount {
        self.mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount
    }
}
