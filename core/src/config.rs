use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count for one game.
///
/// Always valid once constructed: both dimensions are non-zero and at least one cell is
/// left without a mine. Deserialization runs the same checks as [`GameConfig::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedConfig")]
pub struct GameConfig {
    rows: Coord,
    columns: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct UncheckedConfig {
    rows: Coord,
    columns: Coord,
    mines: CellCount,
}

impl TryFrom<UncheckedConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: UncheckedConfig) -> Result<Self> {
        Self::new(raw.rows, raw.columns, raw.mines)
    }
}

impl GameConfig {
    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions);
        }
        let total = mult(rows, columns);
        if mines >= total {
            return Err(GameError::TooManyMines {
                mines,
                capacity: total - 1,
            });
        }
        Ok(Self {
            rows,
            columns,
            mines,
        })
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn columns(&self) -> Coord {
        self.columns
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 8,
            mines: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(GameConfig::new(0, 4, 1), Err(GameError::InvalidDimensions));
        assert_eq!(GameConfig::new(4, 0, 1), Err(GameError::InvalidDimensions));
    }

    #[test]
    fn rejects_board_full_of_mines() {
        assert_eq!(
            GameConfig::new(2, 2, 4),
            Err(GameError::TooManyMines {
                mines: 4,
                capacity: 3
            })
        );
        assert!(GameConfig::new(2, 2, 3).is_ok());
    }

    #[test]
    fn single_cell_without_mines_is_valid() {
        let config = GameConfig::new(1, 1, 0).unwrap();
        assert_eq!(config.safe_cells(), 1);
    }

    #[test]
    fn deserialization_is_validated() {
        let config = GameConfig::from_json(r#"{"rows":9,"columns":9,"mines":10}"#).unwrap();
        assert_eq!(config.size(), (9, 9));
        assert_eq!(config.mines(), 10);

        let err = GameConfig::from_json(r#"{"rows":3,"columns":3,"mines":9}"#).unwrap_err();
        assert!(matches!(err, SaveError::Json(_)));
    }

    #[test]
    fn default_matches_classic_small_board() {
        let config = GameConfig::default();
        assert_eq!(config.size(), (8, 8));
        assert_eq!(config.mines(), 5);
        assert_eq!(config.safe_cells(), 59);
    }
}
