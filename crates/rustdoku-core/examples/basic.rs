//! Basic walkthrough of the engine: generate, play a few moves, solve.

use rustdoku_core::{Difficulty, GameSession, Generator, Solver};

fn main() {
    // Generate a puzzle pair.
    println!("Generating a medium puzzle...\n");
    let mut generator = Generator::new();
    let generated = generator.generate(Difficulty::Medium);

    println!("Puzzle ({} clues):", generated.puzzle.given_count());
    println!("{}", generated.puzzle);
    println!("Solution:");
    println!("{}", generated.solution);

    // Solving the puzzle from scratch reaches a complete board.
    let solver = Solver::new();
    match solver.solve(&generated.puzzle) {
        Some(solved) => println!("Solver filled the board:\n{solved}"),
        None => println!("Solver found no completion (should not happen here)"),
    }

    // Drive a session the way a frontend would.
    let mut session = GameSession::new(Difficulty::Easy);
    let idx = (0..81).find(|&i| !session.is_fixed(i)).unwrap_or(0);

    let status = session.place(idx, 5);
    println!("place(5) at cell {idx}: {status}");

    let report = session.validate();
    println!("validate: {} ({} conflicts)", report.status(), report.conflicts.len());

    let status = session.hint(idx);
    println!("hint at cell {idx}: {status}");

    session.reveal_solution();
    println!("after reveal: {}", session.check_completion());
}
