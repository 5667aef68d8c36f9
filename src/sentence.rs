use std::fmt;

use frozenset::FrozenSet;
use itertools::Itertools;

use crate::grid::Cell;
use crate::KnowledgeError;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Live sentences only ever range over unresolved cells; as cells are
/// classified they are projected out via [`Sentence::mark_mine`] and
/// [`Sentence::mark_safe`]. Two sentences are equal when they have the same
/// cells and the same count.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentence {
    cells: FrozenSet<Cell>,
    count: usize,
}
impl Sentence {
    /// # Errors
    ///
    /// A sentence claiming more mines than it has cells is contradictory.
    pub fn new(
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Self, KnowledgeError> {
        let cells: FrozenSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(KnowledgeError::Contradiction(
                "sentence with more mines than cells",
            ));
        }
        Ok(Self {
            cells,
            count,
        })
    }

    #[must_use]
    pub fn cells(&self) -> &FrozenSet<Cell> {
        &self.cells
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// A sentence with no cells carries no information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// If the count saturates the cell set, every cell is a mine; otherwise
    /// nothing can be concluded and the result is empty.
    #[must_use]
    pub fn known_mines(&self) -> FrozenSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            FrozenSet::default()
        }
    }

    /// If the count is zero, every cell is safe; otherwise nothing can be
    /// concluded and the result is empty.
    #[must_use]
    pub fn known_safes(&self) -> FrozenSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            FrozenSet::default()
        }
    }

    /// Project a cell known to be a mine out of the sentence, decrementing
    /// the count it was already accounted for in. No-op when the cell is not
    /// present.
    ///
    /// # Errors
    ///
    /// Marking a mine inside a sentence whose cells are all provably safe is
    /// a contradiction.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if !self.cells.contains(&cell) {
            return Ok(());
        }
        if self.count == 0 {
            return Err(KnowledgeError::Contradiction(
                "known mine appears in a sentence counting zero mines",
            ));
        }
        self.cells = self.cells.iter().copied().filter(|&c| c != cell).collect();
        self.count -= 1;
        Ok(())
    }

    /// Project a cell known to be safe out of the sentence; the count is
    /// unchanged. No-op when the cell is not present.
    ///
    /// # Errors
    ///
    /// Removing the cell must leave room for the counted mines among the
    /// remaining cells; otherwise the knowledge is contradictory.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if !self.cells.contains(&cell) {
            return Ok(());
        }
        let remaining: FrozenSet<Cell> =
            self.cells.iter().copied().filter(|&c| c != cell).collect();
        if self.count > remaining.len() {
            return Err(KnowledgeError::Contradiction(
                "known safe cell leaves a sentence with more mines than cells",
            ));
        }
        self.cells = remaining;
        Ok(())
    }

    /// Whether this sentence's cells are a subset of the other's. Equal cell
    /// sets are subsets of each other.
    #[must_use]
    pub fn is_subsentence_of(&self, other: &Self) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Given a sentence ranging over a subset of this one's cells, derive the
    /// sentence covering the difference: the cells unique to `self` contain
    /// exactly `self.count - other.count` mines.
    ///
    /// # Errors
    ///
    /// If `other` is not a subsentence of `self`, or the counts cannot be
    /// reconciled, the knowledge base is contradictory.
    pub fn subtract(&self, other: &Self) -> Result<Self, KnowledgeError> {
        if !other.is_subsentence_of(self) {
            return Err(KnowledgeError::Contradiction(
                "subtraction of a non-subset sentence",
            ));
        }
        if other.count > self.count {
            return Err(KnowledgeError::Contradiction(
                "subset sentence claims more mines than its superset",
            ));
        }
        Self::new(
            self.cells.difference(&other.cells).copied(),
            self.count - other.count,
        )
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} = {}",
            self.cells.iter().sorted().format(", "),
            self.count,
        )
    }
}
