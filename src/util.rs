use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Cell, Grid};

/// Ground truth for one game: where the mines actually are.
///
/// The board is the agent's external collaborator. It hands out neighbour
/// counts for observed cells and answers `is_mine` for the driving loop; the
/// agent itself never sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    mines: HashSet<Cell>,
}
impl Board {
    /// Place `mine_count` mines uniformly at random on a `height` x `width`
    /// board, rejection-sampling until enough distinct cells are hit.
    ///
    /// # Errors
    ///
    /// If the board has a zero dimension, or more mines are requested than
    /// there are cells, an error is returned.
    pub fn random(
        height: usize,
        width: usize,
        mine_count: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, String> {
        let grid = Grid::new(height, width).map_err(|e| e.to_string())?;
        if mine_count > grid.cell_count() {
            return Err(format!(
                "cannot place {mine_count} mines on a board of {} cells",
                grid.cell_count(),
            ));
        }
        let mut mines = HashSet::new();
        while mines.len() != mine_count {
            mines.insert(Cell::new(
                rng.gen_range(0..height),
                rng.gen_range(0..width),
            ));
        }
        Ok(Self {
            grid,
            mines,
        })
    }

    /// Create a board from an ASCII-encoded description, where:
    /// - `*` is a mine
    /// - `.` is a clear cell
    /// - Trailing or leading whitespace is ignored
    ///
    /// # Errors
    ///
    /// If the board is not rectangular, has a width or height of 0, or
    /// contains any other character, an error is returned.
    pub fn from_ascii(encoded: &str) -> Result<Self, String> {
        let lines = encoded.trim().lines().map(str::trim).collect::<Vec<_>>();
        let height = lines.len();
        if height == 0 {
            return Err("board must have at least one row".to_string());
        }
        let width = lines[0].len();
        if width == 0 {
            return Err("board must have at least one column".to_string());
        }
        if let Some(line) = lines.iter().find(|l| l.len() != width) {
            return Err(format!(
                "board must be rectangular (found line with length {}, expected length {})",
                line.len(),
                width,
            ));
        }
        let grid = Grid::new(height, width).map_err(|e| e.to_string())?;
        let mut mines = HashSet::new();
        for (row, line) in lines.into_iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                match c {
                    '*' => {
                        mines.insert(Cell::new(row, col));
                    },
                    '.' => {},
                    _ => {
                        return Err(format!(
                            "invalid character '{c}' at ({row}, {col})"
                        ));
                    },
                }
            }
        }
        Ok(Self {
            grid,
            mines,
        })
    }

    /// Render the board in the same codec [`Board::from_ascii`] reads.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out =
            String::with_capacity(self.grid.cell_count() + self.grid.height());
        for row in 0..self.grid.height() {
            for col in 0..self.grid.width() {
                out.push(if self.mines.contains(&Cell::new(row, col)) {
                    '*'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    #[must_use]
    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// Number of mines within one row and column of `cell`, not counting the
    /// cell itself. This is exactly the count an observation reports.
    #[must_use]
    pub fn neighbour_count(&self, cell: Cell) -> usize {
        self.grid
            .adjacent(cell)
            .into_iter()
            .filter(|c| self.mines.contains(c))
            .count()
    }

    /// Whether `found` identifies every mine on the board.
    #[must_use]
    pub fn won(&self, found: &HashSet<Cell>) -> bool {
        *found == self.mines
    }
}
