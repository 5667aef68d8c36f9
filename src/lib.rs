//! Knowledge-base deduction for minesweeper-style grid puzzles.
//!
//! An [`Agent`] ingests `(cell, adjacent-mine-count)` observations, keeps a
//! collection of logical [`Sentence`]s over unresolved cells, and derives
//! every certain consequence by running simplification and subset
//! elimination to a fixpoint. Move selection reads the resulting
//! classification sets and honestly reports when no certain move exists.

use thiserror::Error;

mod engine;
mod grid;
mod sentence;
pub mod util;

pub use engine::Agent;
pub use grid::{Cell, Grid};
pub use sentence::Sentence;

/// Ways an observation, or the derivation it triggers, can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    /// The grid would contain no cells at all.
    #[error("grid must have nonzero dimensions, got {height}x{width}")]
    EmptyGrid { height: usize, width: usize },

    #[error("cell {cell} is outside the {height}x{width} grid")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {0} has already been observed")]
    AlreadyObserved(Cell),

    #[error("count {count} at {cell} exceeds its {adjacent} neighbours")]
    CountOutOfRange {
        cell: Cell,
        count: usize,
        adjacent: usize,
    },

    /// The observation cannot be reconciled with facts already derived. The
    /// knowledge base is no longer trustworthy once this is returned.
    #[error("contradictory knowledge: {0}")]
    Contradiction(&'static str),

    /// The derivation loop was still producing changes when it hit its
    /// diagnostic round cap; well-formed inputs settle long before it.
    #[error("derivation did not settle within {rounds} rounds")]
    Unsettled { rounds: usize },
}
