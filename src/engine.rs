use std::collections::HashSet;

use frozenset::FrozenSet;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};
use crate::sentence::Sentence;
use crate::KnowledgeError;

/// Deduction agent for a single game.
///
/// The agent owns the knowledge base: the cells already played, the cells
/// proven safe, the cells proven to be mines, and the live sentences relating
/// unresolved cells to mine counts. Every [`Agent::observe`] call folds one
/// observation in and re-runs the derivation rules until nothing more can be
/// concluded with certainty. The classification sets only ever grow.
///
/// The agent never guesses: when no certain move exists the selectors say so
/// by returning `None`.
#[derive(Debug, Clone)]
pub struct Agent {
    grid: Grid,
    moves_made: HashSet<Cell>,
    safe: HashSet<Cell>,
    mines: HashSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl Agent {
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            moves_made: HashSet::new(),
            safe: HashSet::new(),
            mines: HashSet::new(),
            knowledge: Vec::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Cells already observed.
    #[must_use]
    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    /// Cells proven not to be mines.
    #[must_use]
    pub fn safe(&self) -> &HashSet<Cell> {
        &self.safe
    }

    /// Cells proven to be mines.
    #[must_use]
    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// The live sentences, in insertion order.
    #[must_use]
    pub fn sentences(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Fold in the observation that `cell` was revealed with `count` mines
    /// adjacent to it, then derive every certain consequence.
    ///
    /// # Errors
    ///
    /// The observation is rejected, leaving the knowledge base untouched,
    /// when `cell` is out of bounds, already observed, or `count` exceeds the
    /// size of the cell's neighbourhood. A count irreconcilable with facts
    /// already derived fails with [`KnowledgeError::Contradiction`]; so does
    /// any contradiction surfacing during derivation, after which the agent
    /// is no longer usable.
    pub fn observe(&mut self, cell: Cell, count: usize) -> Result<(), KnowledgeError> {
        if !self.grid.contains(cell) {
            return Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.grid.height(),
                width: self.grid.width(),
            });
        }
        if self.moves_made.contains(&cell) {
            return Err(KnowledgeError::AlreadyObserved(cell));
        }
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::Contradiction(
                "observed a cell already proven to be a mine",
            ));
        }
        let adjacent = self.grid.adjacent(cell);
        if count > adjacent.len() {
            return Err(KnowledgeError::CountOutOfRange {
                cell,
                count,
                adjacent: adjacent.len(),
            });
        }
        let known_mines = adjacent.iter().filter(|c| self.mines.contains(c)).count();
        let Some(remaining) = count.checked_sub(known_mines) else {
            return Err(KnowledgeError::Contradiction(
                "count is below the mines already known in the neighbourhood",
            ));
        };
        let unresolved: FrozenSet<Cell> = adjacent
            .iter()
            .copied()
            .filter(|c| !self.safe.contains(c) && !self.mines.contains(c))
            .collect();
        if remaining > unresolved.len() {
            return Err(KnowledgeError::Contradiction(
                "count exceeds the unresolved cells in the neighbourhood",
            ));
        }

        self.moves_made.insert(cell);
        self.mark_safe(cell)?;
        if !unresolved.is_empty() {
            let sentence = Sentence::new(unresolved, remaining)?;
            if !self.knowledge.contains(&sentence) {
                self.knowledge.push(sentence);
            }
        }
        self.settle()
    }

    /// A uniformly random cell proven safe but not yet played, or `None`
    /// when no certain move exists.
    pub fn safe_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let pool = self
            .safe
            .difference(&self.moves_made)
            .copied()
            .sorted()
            .collect_vec();
        pool.choose(rng).copied()
    }

    /// A uniformly random cell that is neither played nor a known mine, or
    /// `None` when the board is exhausted.
    pub fn random_move(&self, rng: &mut impl Rng) -> Option<Cell> {
        let pool = self
            .grid
            .cells()
            .filter(|c| !self.moves_made.contains(c) && !self.mines.contains(c))
            .collect_vec();
        pool.choose(rng).copied()
    }

    /// Classify `cell` as a mine and project it out of every live sentence.
    fn mark_mine(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if self.safe.contains(&cell) {
            return Err(KnowledgeError::Contradiction(
                "cell proven safe now proven to be a mine",
            ));
        }
        self.mines.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell)?;
        }
        Ok(())
    }

    /// Classify `cell` as safe and project it out of every live sentence.
    fn mark_safe(&mut self, cell: Cell) -> Result<(), KnowledgeError> {
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::Contradiction(
                "cell proven to be a mine now proven safe",
            ));
        }
        self.safe.insert(cell);
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell)?;
        }
        Ok(())
    }

    /// Run the derivation rules to a fixpoint: repeat direct extraction,
    /// cleanup, subset elimination and the intersection sweep until a full
    /// round reports no change. Re-running with no new observation is a
    /// no-op.
    fn settle(&mut self) -> Result<(), KnowledgeError> {
        let cap = self.round_cap();
        for round in 0..cap {
            let mut changed = self.extract_known()?;
            self.cleanup();
            changed |= self.eliminate_subsets()?;
            changed |= self.intersection_sweep()?;
            if !changed {
                log::debug!(
                    "knowledge settled after {round} rounds: {} safe, {} mines, {} live sentences",
                    self.safe.len(),
                    self.mines.len(),
                    self.knowledge.len(),
                );
                return Ok(());
            }
        }
        log::warn!("derivation still producing changes after {cap} rounds");
        Err(KnowledgeError::Unsettled {
            rounds: cap,
        })
    }

    // Every changed round classifies a previously unresolved cell or appends
    // a sentence that was never live before; both supplies are finite, so a
    // well-formed game settles far below this bound.
    fn round_cap(&self) -> usize {
        8 * self.grid.cell_count() + 64
    }

    /// Pull every directly-known mine and safe cell out of the live
    /// sentences and classify them globally.
    fn extract_known(&mut self) -> Result<bool, KnowledgeError> {
        let mut mined = Vec::new();
        let mut safes = Vec::new();
        for sentence in &self.knowledge {
            mined.extend(sentence.known_mines().iter().copied());
            safes.extend(sentence.known_safes().iter().copied());
        }
        let mut changed = false;
        for cell in mined {
            if !self.mines.contains(&cell) {
                log::debug!("deduced mine at {cell}");
                self.mark_mine(cell)?;
                changed = true;
            }
        }
        for cell in safes {
            if !self.safe.contains(&cell) {
                log::debug!("deduced safe at {cell}");
                self.mark_safe(cell)?;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Drop sentences that carry no information: emptied ones, and exact
    /// duplicates of an earlier live sentence.
    fn cleanup(&mut self) {
        let mut seen = HashSet::new();
        self.knowledge
            .retain(|sentence| !sentence.is_empty() && seen.insert(sentence.clone()));
    }

    /// For every pair of live sentences where one ranges over a subset of
    /// the other's cells, derive the sentence covering the difference. The
    /// scan runs over a snapshot; derivations are appended as one batch.
    fn eliminate_subsets(&mut self) -> Result<bool, KnowledgeError> {
        let mut derived = Vec::new();
        for (i, first) in self.knowledge.iter().enumerate() {
            for second in &self.knowledge[i + 1..] {
                let inferred = if first.is_subsentence_of(second) {
                    second.subtract(first)?
                } else if second.is_subsentence_of(first) {
                    first.subtract(second)?
                } else {
                    continue;
                };
                if !inferred.is_empty()
                    && !self.knowledge.contains(&inferred)
                    && !derived.contains(&inferred)
                {
                    derived.push(inferred);
                }
            }
        }
        if derived.is_empty() {
            return Ok(false);
        }
        log::debug!("subset elimination derived {} new sentences", derived.len());
        self.knowledge.extend(derived);
        Ok(true)
    }

    /// Classify cells shared by every live sentence when all their holders
    /// agree: all saturated means mine, all zero-count means safe.
    fn intersection_sweep(&mut self) -> Result<bool, KnowledgeError> {
        let shared: Vec<Cell> = {
            let Some((first, rest)) = self.knowledge.split_first() else {
                return Ok(false);
            };
            let mut shared: HashSet<Cell> = first.cells().iter().copied().collect();
            for sentence in rest {
                shared.retain(|cell| sentence.cells().contains(cell));
            }
            shared.into_iter().sorted().collect()
        };

        let mut changed = false;
        for cell in shared {
            if self.mines.contains(&cell) || self.safe.contains(&cell) {
                continue;
            }
            let mut held = false;
            let mut all_saturated = true;
            let mut all_clear = true;
            for sentence in &self.knowledge {
                if !sentence.cells().contains(&cell) {
                    continue;
                }
                held = true;
                all_saturated &= sentence.count() == sentence.cells().len();
                all_clear &= sentence.count() == 0;
            }
            if !held {
                continue;
            }
            if all_saturated {
                log::debug!("every sentence holding {cell} is saturated");
                self.mark_mine(cell)?;
                changed = true;
            } else if all_clear {
                log::debug!("every sentence holding {cell} counts zero mines");
                self.mark_safe(cell)?;
                changed = true;
            }
        }
        Ok(changed)
    }
}
