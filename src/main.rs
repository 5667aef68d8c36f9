use minewise::util::Board;
use minewise::Agent;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let board = Board::random(8, 8, 8, &mut rng).expect("valid board parameters");
    let mut agent = Agent::new(board.grid());

    loop {
        let (cell, certain) = match agent.safe_move(&mut rng) {
            Some(cell) => (cell, true),
            None => match agent.random_move(&mut rng) {
                Some(cell) => (cell, false),
                None => break,
            },
        };
        if board.is_mine(cell) {
            println!("stepped on a mine at {cell} (guessed move)");
            print!("{}", board.render());
            return;
        }
        let count = board.neighbour_count(cell);
        println!(
            "{} {cell}: {count} adjacent",
            if certain { "opened" } else { "guessed" },
        );
        if let Err(err) = agent.observe(cell, count) {
            println!("knowledge base rejected the observation: {err}");
            return;
        }
    }

    if board.won(agent.mines()) {
        println!(
            "swept {} cells and flagged all {} mines",
            agent.moves_made().len(),
            board.mine_count(),
        );
    } else {
        println!(
            "out of moves with {} of {} mines flagged",
            agent.mines().len(),
            board.mine_count(),
        );
    }
    print!("{}", board.render());
}
