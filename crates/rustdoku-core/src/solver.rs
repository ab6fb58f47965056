//! Exhaustive backtracking solver.
//!
//! Depth-first search over positions 0..81 in row-major order, digits tried
//! 1..=9 ascending. No heuristics and no randomness: the same input always
//! walks the same tree, which the completion check relies on. An unsolvable
//! board is an expected outcome of search, reported as `None` rather than an
//! error.

use crate::board::{Grid, CELL_COUNT};
use crate::validator::placement_fits;

/// Unit struct solver — stateless, all state is per-call.
#[derive(Debug, Default)]
pub struct Solver;

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Fill the board to a complete valid solution, or return `None` if no
    /// digit assignment satisfies the constraints. Cells already holding a
    /// digit are kept as-is, so partially filled boards solve from where
    /// they stand; a fully filled board comes back unchanged iff it is
    /// internally consistent.
    pub fn solve(&self, grid: &Grid) -> Option<Grid> {
        let mut working = grid.clone();
        if solve_from(&mut working, 0) {
            Some(working)
        } else {
            None
        }
    }
}

fn solve_from(grid: &mut Grid, idx: usize) -> bool {
    if idx == CELL_COUNT {
        return true;
    }
    if let Some(value) = grid.get(idx) {
        // Pre-filled cells are not branched on, but they must themselves fit:
        // a conflicting pair can never be completed, and verifying a filled
        // board is one of this solver's two jobs.
        return placement_fits(grid, idx, value) && solve_from(grid, idx + 1);
    }
    for value in 1..=9 {
        if placement_fits(grid, idx, value) {
            grid.set_value(idx, Some(value));
            if solve_from(grid, idx + 1) {
                return true;
            }
            grid.set_value(idx, None);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::conflicts;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_solve_classic_puzzle() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let solution = Solver::new().solve(&grid).unwrap();

        assert!(solution.is_complete());
        assert!(conflicts(&solution).is_empty());

        // Givens survive untouched.
        for idx in 0..CELL_COUNT {
            if let Some(v) = grid.get(idx) {
                assert_eq!(solution.get(idx), Some(v));
            }
        }
    }

    #[test]
    fn test_solve_empty_board() {
        let solution = Solver::new().solve(&Grid::empty()).unwrap();
        assert!(solution.is_complete());
        assert!(conflicts(&solution).is_empty());

        // Digits tried ascending from position 0: the first row of the
        // search over an empty board is 1..9 in order.
        assert_eq!(solution.row_values(0), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_unsatisfiable_board() {
        let mut grid = Grid::empty();
        grid.set_given(0, 5);
        grid.set_given(1, 5); // duplicate in row 0

        assert!(Solver::new().solve(&grid).is_none());
    }

    #[test]
    fn test_one_hole_recovery() {
        use crate::generator::{Difficulty, Generator};

        // A solved grid with a single cell knocked out has exactly one way
        // back, and the solver finds it.
        let solution = Generator::with_seed(8).generate(Difficulty::Easy).solution;
        let mut grid = solution.clone();
        grid.set_value(40, None);

        let solved = Solver::new().solve(&grid).unwrap();
        assert_eq!(solved.values(), solution.values());
    }

    #[test]
    fn test_deterministic() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let solver = Solver::new();

        let first = solver.solve(&grid).unwrap();
        let second = solver.solve(&grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_consistent_board_accepted_unchanged() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let solution = Solver::new().solve(&grid).unwrap();

        let again = Solver::new().solve(&solution).unwrap();
        assert_eq!(again, solution);
    }

    #[test]
    fn test_full_inconsistent_board_rejected() {
        let grid = Grid::from_string(PUZZLE).unwrap();
        let mut solution = Solver::new().solve(&grid).unwrap();

        // Overwrite one cell with a duplicate of its row neighbour.
        let neighbour = solution.get(1).unwrap();
        solution.set_value(0, Some(neighbour));
        assert!(Solver::new().solve(&solution).is_none());
    }
}
