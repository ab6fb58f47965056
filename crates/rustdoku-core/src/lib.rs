//! Sudoku engine: board model, constraint validation, backtracking solving,
//! transformation-based puzzle generation, and the game session frontends
//! drive.
//!
//! The crate is deliberately I/O-free. Frontends feed cell indices and
//! digits into a [`GameSession`] and render the boards it hands back; all
//! randomness sits behind [`Generator`], which can be seeded for
//! reproducible puzzles.

pub mod board;
pub mod generator;
pub mod session;
pub mod solver;
pub mod validator;

pub use board::{box_of, col_of, row_of, Cell, Grid, Position, BOX_SIZE, CELL_COUNT, SIZE};
pub use generator::{Difficulty, GeneratedPuzzle, Generator, CANONICAL};
pub use session::{ConflictReport, GameSession, SessionStatus};
pub use solver::Solver;
pub use validator::{conflicts, placement_fits};
