use std::cmp::min;
use std::fmt;

use crate::KnowledgeError;

/// A coordinate on the board, zero-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}
impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
        }
    }
}
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self {
            row,
            col,
        }
    }
}

/// Board geometry: fixed dimensions, no cell contents.
///
/// Bounds live here so that every other component can treat a [`Cell`] as an
/// opaque tag.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    height: usize,
    width: usize,
}
impl Grid {
    /// # Errors
    ///
    /// If either dimension is zero, an error is returned.
    pub fn new(height: usize, width: usize) -> Result<Self, KnowledgeError> {
        if height == 0 || width == 0 {
            return Err(KnowledgeError::EmptyGrid {
                height,
                width,
            });
        }
        Ok(Self {
            height,
            width,
        })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.height * self.width
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Get a list of cells adjacent to the given cell (the 8-neighbourhood,
    /// clipped to the board and excluding the cell itself).
    ///
    /// `cell` must be in bounds.
    #[must_use]
    pub fn adjacent(&self, cell: Cell) -> Vec<Cell> {
        let mut adjacent = Vec::with_capacity(8);
        for row in cell.row.saturating_sub(1)..=min(cell.row + 1, self.height - 1) {
            for col in cell.col.saturating_sub(1)..=min(cell.col + 1, self.width - 1) {
                if row == cell.row && col == cell.col {
                    continue;
                }
                adjacent.push(Cell::new(row, col));
            }
        }
        adjacent
    }

    /// All cells of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(Grid::new(0, 3).is_err());
        assert!(Grid::new(3, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn adjacency_is_clipped_at_the_edges() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(
            grid.adjacent(Cell::new(0, 0)),
            vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)],
        );
        assert_eq!(grid.adjacent(Cell::new(1, 1)).len(), 8);
        assert_eq!(
            grid.adjacent(Cell::new(2, 1)),
            vec![
                Cell::new(1, 0),
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 0),
                Cell::new(2, 2),
            ],
        );
    }

    #[test]
    fn cells_enumerate_row_major() {
        let grid = Grid::new(2, 2).unwrap();
        assert_eq!(
            grid.cells().collect::<Vec<_>>(),
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1),
            ],
        );
    }

    #[test]
    fn containment_matches_bounds() {
        let grid = Grid::new(2, 4).unwrap();
        assert!(grid.contains(Cell::new(1, 3)));
        assert!(!grid.contains(Cell::new(2, 0)));
        assert!(!grid.contains(Cell::new(0, 4)));
    }
}
