use ndarray::Array2;

/// Row or column index. Boards are at most 255 cells on a side.
pub type Coord = u8;

/// Wide enough for the cell count of the largest board.
pub type CellCount = u16;

/// `(row, column)`, zero-based from the top-left cell.
pub type Coord2 = (Coord, Coord);

/// Converts board coordinates into an `ndarray` index.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Cell count of an `a` by `b` board.
pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `coords` falls inside a board of `size`.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

pub(crate) fn array_size<T>(array: &Array2<T>) -> Coord2 {
    let (rows, columns) = array.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        columns.try_into().unwrap_or(Coord::MAX),
    )
}

// row-major
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// None once the step leaves the board on either axis
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, column) = coords;
    let (dr, dc) = delta;
    let (max_row, max_column) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_column = column.checked_add_signed(dc.try_into().ok()?)?;
    if next_column >= max_column {
        return None;
    }

    Some((next_row, next_column))
}

/// Up to eight cells around `center`, row by row from the top-left. Cells off the board are
/// skipped, and an off-board center has no neighbors at all.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        let index = if in_bounds(center, bounds) {
            0
        } else {
            DISPLACEMENTS.len() as u8
        };
        Self {
            center,
            bounds,
            index,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
