//! Game session: the boundary object a frontend drives.
//!
//! A session owns three boards: the generated answer key, the initial
//! puzzle (whose non-empty cells are fixed for the whole game), and the
//! player's working copy. Every operation is synchronous, runs to
//! completion, and reports a [`SessionStatus`] — bad input is classified
//! and rejected, never a panic.

use std::fmt::{self, Display, Formatter};

use crate::board::{Grid, CELL_COUNT};
use crate::generator::{Difficulty, GeneratedPuzzle, Generator};
use crate::solver::Solver;
use crate::validator;

/// Classified outcome of a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A new puzzle replaced the session boards.
    NewBoardReady,
    /// The digit was written to the working board.
    Placed,
    /// The cell was emptied.
    Cleared,
    /// Every non-fixed cell was emptied.
    BoardCleared,
    /// Rejected: the cell was one of the puzzle's clues.
    CellFixed,
    /// Rejected: no valid cell index (or digit) was supplied.
    NoSelection,
    /// The solution digit was copied into the cell.
    HintApplied,
    /// The whole solution was copied onto the working board.
    SolutionRevealed,
    /// Validation found no rule violations among placed digits.
    NoConflicts,
    /// Validation found at least one rule violation.
    ConflictsFound,
    /// Completion check: the board still has empty cells.
    Incomplete,
    /// Completion check: the filled board satisfies every constraint.
    SolvedCorrectly,
    /// Completion check: the filled board breaks a constraint.
    SolutionInvalid,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NewBoardReady => "New board generated",
            Self::Placed => "Digit placed",
            Self::Cleared => "Cell cleared",
            Self::BoardCleared => "Board cleared",
            Self::CellFixed => "Cannot change a fixed cell",
            Self::NoSelection => "Select a cell first",
            Self::HintApplied => "Hint applied",
            Self::SolutionRevealed => "Solution revealed",
            Self::NoConflicts => "No conflicts detected",
            Self::ConflictsFound => "Conflicts found (marked)",
            Self::Incomplete => "The board is not complete",
            Self::SolvedCorrectly => "Board complete and valid!",
            Self::SolutionInvalid => "Solution is not valid",
        };
        f.write_str(text)
    }
}

/// Result of a conflict scan, for display only.
#[derive(Debug, Clone)]
pub struct ConflictReport {
    /// Indices of placed digits that violate a row/column/box constraint.
    pub conflicts: Vec<usize>,
}

impl ConflictReport {
    /// Whether the scan found nothing.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// The matching status classification.
    pub fn status(&self) -> SessionStatus {
        if self.is_clean() {
            SessionStatus::NoConflicts
        } else {
            SessionStatus::ConflictsFound
        }
    }
}

/// A running game: answer key, fixed puzzle, and working board.
#[derive(Debug, Clone)]
pub struct GameSession {
    solution: Grid,
    initial: Grid,
    current: Grid,
    difficulty: Difficulty,
}

impl GameSession {
    /// Start a session with a freshly generated puzzle.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_generated(Generator::new().generate(difficulty), difficulty)
    }

    /// Start a session from a seeded generator, for reproducible games.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_generated(Generator::with_seed(seed).generate(difficulty), difficulty)
    }

    fn from_generated(generated: GeneratedPuzzle, difficulty: Difficulty) -> Self {
        let current = generated.puzzle.clone();
        Self {
            solution: generated.solution,
            initial: generated.puzzle,
            current,
            difficulty,
        }
    }

    /// Rebuild a session from saved boards. Only cell values are read;
    /// given flags are reconstructed from the initial board. Returns `None`
    /// if the boards do not belong together: the solution must be complete
    /// and valid, the initial board's clues must agree with it, and the
    /// working board must agree with the clues.
    pub fn from_parts(
        solution: Grid,
        initial: Grid,
        current: Grid,
        difficulty: Difficulty,
    ) -> Option<Self> {
        if !solution.is_complete() || !validator::conflicts(&solution).is_empty() {
            return None;
        }

        let initial = Grid::from_values(initial.values());
        let mut rebuilt = initial.clone();
        for idx in 0..CELL_COUNT {
            match initial.get(idx) {
                Some(clue) => {
                    if solution.get(idx) != Some(clue) || current.get(idx) != Some(clue) {
                        return None;
                    }
                }
                None => rebuilt.set_value(idx, current.get(idx)),
            }
        }

        Some(Self {
            solution,
            initial,
            current: rebuilt,
            difficulty,
        })
    }

    /// The answer key.
    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    /// The puzzle as dealt; its non-empty cells are fixed.
    pub fn initial(&self) -> &Grid {
        &self.initial
    }

    /// The player's working board.
    pub fn current(&self) -> &Grid {
        &self.current
    }

    /// Difficulty the current puzzle was generated at.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether a cell was one of the puzzle's clues.
    pub fn is_fixed(&self, idx: usize) -> bool {
        idx < CELL_COUNT && self.initial.get(idx).is_some()
    }

    /// Replace all three boards with a freshly generated puzzle. Frontends
    /// should reset any of their own per-game state (pencil marks, timers)
    /// when this returns.
    pub fn new_game(&mut self, difficulty: Difficulty) -> SessionStatus {
        *self = Self::new(difficulty);
        SessionStatus::NewBoardReady
    }

    /// Write a digit into a non-fixed cell. A `value` of 0 clears instead.
    pub fn place(&mut self, idx: usize, value: u8) -> SessionStatus {
        if idx >= CELL_COUNT || value > 9 {
            return SessionStatus::NoSelection;
        }
        if value == 0 {
            return self.clear(idx);
        }
        if self.is_fixed(idx) {
            return SessionStatus::CellFixed;
        }
        self.current.set_value(idx, Some(value));
        SessionStatus::Placed
    }

    /// Empty a non-fixed cell.
    pub fn clear(&mut self, idx: usize) -> SessionStatus {
        if idx >= CELL_COUNT {
            return SessionStatus::NoSelection;
        }
        if self.is_fixed(idx) {
            return SessionStatus::CellFixed;
        }
        self.current.set_value(idx, None);
        SessionStatus::Cleared
    }

    /// Empty every non-fixed cell.
    pub fn clear_all_non_fixed(&mut self) -> SessionStatus {
        for idx in 0..CELL_COUNT {
            if !self.is_fixed(idx) {
                self.current.set_value(idx, None);
            }
        }
        SessionStatus::BoardCleared
    }

    /// Copy the solution digit into a non-fixed cell.
    pub fn hint(&mut self, idx: usize) -> SessionStatus {
        if idx >= CELL_COUNT {
            return SessionStatus::NoSelection;
        }
        if self.is_fixed(idx) {
            return SessionStatus::CellFixed;
        }
        self.current.set_value(idx, self.solution.get(idx));
        SessionStatus::HintApplied
    }

    /// Copy the whole solution onto the working board.
    pub fn reveal_solution(&mut self) -> SessionStatus {
        self.current = self.solution.clone();
        SessionStatus::SolutionRevealed
    }

    /// Scan the working board for rule violations. Display-only: the board
    /// is never mutated and conflicting digits stay in place.
    pub fn validate(&self) -> ConflictReport {
        ConflictReport {
            conflicts: validator::conflicts(&self.current),
        }
    }

    /// Check whether the game is finished. Any filled board the solver
    /// accepts counts as solved, whether or not it matches the generated
    /// answer key — dug puzzles are not guaranteed to have a unique
    /// solution.
    pub fn check_completion(&self) -> SessionStatus {
        if !self.current.is_complete() {
            return SessionStatus::Incomplete;
        }
        match Solver::new().solve(&self.current) {
            Some(_) => SessionStatus::SolvedCorrectly,
            None => SessionStatus::SolutionInvalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::CANONICAL;

    fn session() -> GameSession {
        GameSession::with_seed(Difficulty::Medium, 1)
    }

    fn first_hole(session: &GameSession) -> usize {
        (0..CELL_COUNT)
            .find(|&idx| !session.is_fixed(idx))
            .unwrap()
    }

    fn first_clue(session: &GameSession) -> usize {
        (0..CELL_COUNT).find(|&idx| session.is_fixed(idx)).unwrap()
    }

    #[test]
    fn test_new_session_boards_agree() {
        let s = session();
        assert_eq!(s.initial(), s.current());
        assert_eq!(s.difficulty(), Difficulty::Medium);
        assert_eq!(s.initial().empty_count(), Difficulty::Medium.hole_count());
    }

    #[test]
    fn test_place_rejects_fixed_cell() {
        let mut s = session();
        let idx = first_clue(&s);
        let before = s.current().get(idx);

        assert_eq!(s.place(idx, 9), SessionStatus::CellFixed);
        assert_eq!(s.current().get(idx), before);
    }

    #[test]
    fn test_place_and_clear() {
        let mut s = session();
        let idx = first_hole(&s);

        assert_eq!(s.place(idx, 5), SessionStatus::Placed);
        assert_eq!(s.current().get(idx), Some(5));

        assert_eq!(s.clear(idx), SessionStatus::Cleared);
        assert_eq!(s.current().get(idx), None);

        // Placing 0 clears too.
        s.place(idx, 5);
        assert_eq!(s.place(idx, 0), SessionStatus::Cleared);
        assert_eq!(s.current().get(idx), None);
    }

    #[test]
    fn test_out_of_range_requests_rejected() {
        let mut s = session();
        assert_eq!(s.place(81, 5), SessionStatus::NoSelection);
        assert_eq!(s.place(0, 10), SessionStatus::NoSelection);
        assert_eq!(s.clear(100), SessionStatus::NoSelection);
        assert_eq!(s.hint(81), SessionStatus::NoSelection);
    }

    #[test]
    fn test_hint_copies_solution_digit() {
        let mut s = session();
        let idx = first_hole(&s);

        assert_eq!(s.hint(idx), SessionStatus::HintApplied);
        assert_eq!(s.current().get(idx), s.solution().get(idx));

        let clue = first_clue(&s);
        assert_eq!(s.hint(clue), SessionStatus::CellFixed);
    }

    #[test]
    fn test_reveal_and_check() {
        let mut s = session();
        assert_eq!(s.check_completion(), SessionStatus::Incomplete);

        assert_eq!(s.reveal_solution(), SessionStatus::SolutionRevealed);
        assert_eq!(s.current(), s.solution());
        assert_eq!(s.check_completion(), SessionStatus::SolvedCorrectly);
    }

    #[test]
    fn test_check_rejects_inconsistent_filled_board() {
        let mut s = session();
        s.reveal_solution();

        // Overwrite one non-fixed cell with a duplicate of a row peer.
        let idx = first_hole(&s);
        let row = idx / 9;
        let peer = (0..9).map(|c| row * 9 + c).find(|&i| i != idx).unwrap();
        let duplicate = s.current().get(peer).unwrap();
        s.place(idx, duplicate);

        assert_eq!(s.check_completion(), SessionStatus::SolutionInvalid);
    }

    #[test]
    fn test_clear_all_keeps_clues() {
        let mut s = session();
        let hole = first_hole(&s);
        s.place(hole, 3);

        assert_eq!(s.clear_all_non_fixed(), SessionStatus::BoardCleared);
        assert_eq!(s.current(), s.initial());
    }

    #[test]
    fn test_validate_flags_conflicts_without_mutating() {
        let mut s = session();
        assert!(s.validate().is_clean());
        assert_eq!(s.validate().status(), SessionStatus::NoConflicts);

        // Force a duplicate against a clue sharing a row with a hole. Some
        // row must hold both: 35 clues cannot fill a whole number of rows.
        let (clue, hole) = (0..9)
            .find_map(|row| {
                let clue = (0..9).map(|c| row * 9 + c).find(|&i| s.is_fixed(i))?;
                let hole = (0..9).map(|c| row * 9 + c).find(|&i| !s.is_fixed(i))?;
                Some((clue, hole))
            })
            .unwrap();
        let value = s.current().get(clue).unwrap();
        s.place(hole, value);

        let report = s.validate();
        assert_eq!(report.status(), SessionStatus::ConflictsFound);
        assert!(report.conflicts.contains(&clue));
        assert!(report.conflicts.contains(&hole));
        // The conflicting digit stays on the board for the player to fix.
        assert_eq!(s.current().get(hole), Some(value));
    }

    #[test]
    fn test_new_game_replaces_boards() {
        let mut s = session();
        let old_solution = s.solution().clone();

        assert_eq!(s.new_game(Difficulty::Hard), SessionStatus::NewBoardReady);
        assert_eq!(s.difficulty(), Difficulty::Hard);
        assert_eq!(s.initial().empty_count(), Difficulty::Hard.hole_count());
        // Vanishingly unlikely to regenerate the same board.
        assert_ne!(s.solution(), &old_solution);
    }

    #[test]
    fn test_completion_is_permissive() {
        // An empty puzzle admits many solutions; filling in any valid grid
        // other than the stored answer key still counts as solved.
        let solution = Grid::from_values(CANONICAL);
        let mut other = Generator::with_seed(99).generate(Difficulty::Easy).solution;
        if other == solution {
            other = Generator::with_seed(100).generate(Difficulty::Easy).solution;
        }

        let s = GameSession::from_parts(solution, Grid::empty(), other, Difficulty::Easy).unwrap();
        assert_ne!(s.current(), s.solution());
        assert_eq!(s.check_completion(), SessionStatus::SolvedCorrectly);
    }

    #[test]
    fn test_from_parts_round_trip() {
        let mut s = session();
        let hole = first_hole(&s);
        s.place(hole, 4);

        let rebuilt = GameSession::from_parts(
            s.solution().clone(),
            s.initial().clone(),
            s.current().clone(),
            s.difficulty(),
        )
        .unwrap();
        assert_eq!(rebuilt.current(), s.current());
        assert_eq!(rebuilt.initial(), s.initial());
        assert!(rebuilt.is_fixed(first_clue(&s)));
        assert!(!rebuilt.is_fixed(hole));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_boards() {
        let s = session();

        // Clue disagrees with the solution.
        let mut bad_initial = s.initial().clone();
        let clue = first_clue(&s);
        let wrong = s.solution().get(clue).unwrap() % 9 + 1;
        bad_initial.set_value(clue, Some(wrong));
        assert!(GameSession::from_parts(
            s.solution().clone(),
            bad_initial,
            s.current().clone(),
            s.difficulty(),
        )
        .is_none());

        // Incomplete solution board.
        assert!(GameSession::from_parts(
            s.initial().clone(),
            s.initial().clone(),
            s.current().clone(),
            s.difficulty(),
        )
        .is_none());
    }
}
