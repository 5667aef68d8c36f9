//! End-to-end scenarios for the deduction agent: full observation
//! sequences against ground-truth boards, and property checks for the
//! sentence algebra and the knowledge-base invariants.

use std::collections::HashSet;

use minewise::util::Board;
use minewise::{Agent, Cell, Grid, KnowledgeError, Sentence};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn cells(coords: &[(usize, usize)]) -> HashSet<Cell> {
    coords.iter().copied().map(Cell::from).collect()
}

#[test]
fn zero_observation_clears_all_eight_neighbours() {
    let mut agent = Agent::new(Grid::new(3, 3).unwrap());
    agent.observe(Cell::new(1, 1), 0).unwrap();
    for cell in agent.grid().cells() {
        assert!(agent.safe().contains(&cell), "{cell} should be safe");
    }
    assert!(agent.mines().is_empty());
}

#[test]
fn observations_reduce_over_cells_already_known_safe() {
    let mut agent = Agent::new(Grid::new(3, 3).unwrap());
    // Observing the centre makes it safe and constrains its neighbourhood.
    agent.observe(Cell::new(1, 1), 1).unwrap();
    // The corner's sentence must then range over the two cells not already
    // resolved: (0, 1) and (1, 0).
    agent.observe(Cell::new(0, 0), 1).unwrap();

    let reduced = Sentence::new([Cell::new(0, 1), Cell::new(1, 0)], 1).unwrap();
    assert!(
        agent.sentences().contains(&reduced),
        "expected {reduced} among {:?}",
        agent.sentences(),
    );
    assert!(agent.mines().is_empty());
    assert!(!agent.safe().contains(&Cell::new(0, 1)));
    assert!(!agent.safe().contains(&Cell::new(1, 0)));
}

#[test]
fn subset_elimination_pins_down_the_mine() {
    // Single mine at (0, 1); every other cell is deducible with certainty.
    let board = Board::from_ascii(
        ".*.
         ...
         ...",
    )
    .unwrap();
    let mut agent = Agent::new(board.grid());
    for cell in [
        Cell::new(2, 0),
        Cell::new(2, 2),
        Cell::new(1, 0),
        Cell::new(1, 2),
        Cell::new(1, 1),
    ] {
        agent.observe(cell, board.neighbour_count(cell)).unwrap();
    }

    assert_eq!(agent.mines(), &cells(&[(0, 1)]));
    assert_eq!(
        agent.safe(),
        &cells(&[
            (0, 0),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 0),
            (2, 1),
            (2, 2),
        ]),
    );
    // Everything resolved: no live sentences remain.
    assert_eq!(agent.sentences(), &[]);
    assert!(board.won(agent.mines()));
}

#[test]
fn exhausted_boards_signal_no_move_available() {
    let mut agent = Agent::new(Grid::new(1, 1).unwrap());
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    agent.observe(Cell::new(0, 0), 0).unwrap();
    assert_eq!(agent.safe_move(&mut rng), None);
    assert_eq!(agent.random_move(&mut rng), None);
}

#[test]
fn classification_sets_grow_monotonically() {
    let board = Board::from_ascii(
        "..*.
         ....
         .*..
         ....",
    )
    .unwrap();
    let mut agent = Agent::new(board.grid());
    let mut prev_safe = HashSet::new();
    let mut prev_mines = HashSet::new();
    for cell in [
        Cell::new(0, 0),
        Cell::new(3, 3),
        Cell::new(3, 0),
        Cell::new(1, 2),
        Cell::new(0, 3),
    ] {
        agent.observe(cell, board.neighbour_count(cell)).unwrap();
        assert!(prev_safe.is_subset(agent.safe()));
        assert!(prev_mines.is_subset(agent.mines()));
        assert!(agent.safe().is_disjoint(agent.mines()));
        prev_safe = agent.safe().clone();
        prev_mines = agent.mines().clone();
    }
}

#[test]
fn precondition_violations_are_rejected() {
    let mut agent = Agent::new(Grid::new(2, 3).unwrap());
    assert!(matches!(
        agent.observe(Cell::new(5, 0), 0),
        Err(KnowledgeError::OutOfBounds { .. }),
    ));
    assert!(matches!(
        agent.observe(Cell::new(0, 0), 9),
        Err(KnowledgeError::CountOutOfRange { .. }),
    ));
    agent.observe(Cell::new(0, 0), 0).unwrap();
    assert!(matches!(
        agent.observe(Cell::new(0, 0), 0),
        Err(KnowledgeError::AlreadyObserved(_)),
    ));
}

#[test]
fn contradictory_observations_are_surfaced_not_absorbed() {
    let mut agent = Agent::new(Grid::new(2, 2).unwrap());
    agent.observe(Cell::new(0, 0), 0).unwrap();
    // All of (0, 1)'s neighbours are proven safe; claiming two mines among
    // them is contradictory.
    assert!(matches!(
        agent.observe(Cell::new(0, 1), 2),
        Err(KnowledgeError::Contradiction(_)),
    ));
}

/// Play one full game: certain moves when they exist, guesses otherwise.
/// Returns the agent mid-state if a guess hits a mine.
fn play(board: &Board, rng: &mut ChaCha8Rng) -> Agent {
    let mut agent = Agent::new(board.grid());
    loop {
        let Some(cell) = agent.safe_move(rng).or_else(|| agent.random_move(rng))
        else {
            return agent;
        };
        if board.is_mine(cell) {
            return agent;
        }
        agent
            .observe(cell, board.neighbour_count(cell))
            .expect("consistent board observations never contradict");
    }
}

fn assert_sound(agent: &Agent, board: &Board) {
    assert!(agent.safe().is_disjoint(agent.mines()));
    for &cell in agent.safe() {
        assert!(!board.is_mine(cell), "{cell} classified safe but is a mine");
    }
    for &cell in agent.mines() {
        assert!(board.is_mine(cell), "{cell} classified mine but is clear");
    }
    for sentence in agent.sentences() {
        assert!(!sentence.is_empty());
        assert!(sentence.count() <= sentence.cells().len());
        for cell in sentence.cells().iter() {
            assert!(!agent.safe().contains(cell));
            assert!(!agent.mines().contains(cell));
        }
    }
}

#[test]
fn a_full_seeded_game_stays_sound() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let board = Board::random(9, 9, 10, &mut rng).unwrap();
    let agent = play(&board, &mut rng);
    assert_sound(&agent, &board);
}

proptest! {
    /// Whatever the board and however the guesses fall, the agent never
    /// misclassifies a cell and never violates the sentence invariants.
    #[test]
    fn agent_deductions_are_always_sound(
        height in 2usize..7,
        width in 2usize..7,
        mines in 0usize..12,
        board_seed in any::<u64>(),
        play_seed in any::<u64>(),
    ) {
        let mut board_rng = ChaCha8Rng::seed_from_u64(board_seed);
        let mine_count = mines.min(height * width);
        let board =
            Board::random(height, width, mine_count, &mut board_rng).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(play_seed);
        let agent = play(&board, &mut rng);
        assert_sound(&agent, &board);
        prop_assert!(agent.moves_made().len() <= height * width);
    }

    /// Subset elimination is algebraically sound: for any consistent pair of
    /// sentences A ⊆ B, the derived sentence covers exactly B − A and counts
    /// exactly B.count − A.count mines.
    #[test]
    fn subtraction_matches_the_set_difference(
        coords in prop::collection::hash_set((0usize..6, 0usize..6), 1..9),
        membership in prop::collection::vec(any::<bool>(), 9),
        sub_pick in any::<u16>(),
        extra_pick in any::<u16>(),
    ) {
        let superset: HashSet<Cell> =
            coords.iter().copied().map(Cell::from).collect();
        let subset: HashSet<Cell> = superset
            .iter()
            .enumerate()
            .filter(|(i, _)| membership[i % membership.len()])
            .map(|(_, &c)| c)
            .collect();
        let unique = superset.len() - subset.len();
        let sub_count = sub_pick as usize % (subset.len() + 1);
        let extra = extra_pick as usize % (unique + 1);

        let sup =
            Sentence::new(superset.iter().copied(), sub_count + extra).unwrap();
        let sub = Sentence::new(subset.iter().copied(), sub_count).unwrap();
        let derived = sup.subtract(&sub).unwrap();

        prop_assert_eq!(derived.count(), extra);
        let expected: HashSet<Cell> =
            superset.difference(&subset).copied().collect();
        let got: HashSet<Cell> = derived.cells().iter().copied().collect();
        prop_assert_eq!(got, expected);
    }
}
