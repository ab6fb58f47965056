//! Puzzle generation.
//!
//! Every board starts from one fixed solved grid and is randomized by
//! transformations drawn from the symmetry group of the Sudoku constraint:
//! relabeling the digits, permuting rows and columns within their bands and
//! stacks, and relocating whole bands. Each step maps a valid grid to a
//! valid grid, so no solving is needed to produce the answer key. The puzzle
//! is then derived by zeroing a difficulty-determined number of cells.
//!
//! The result is varied enough for gameplay but is not a uniform sample over
//! all valid grids, and the dug puzzle is not checked for uniqueness.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Grid, BOX_SIZE, CELL_COUNT, SIZE};

/// The fixed solved grid all generation starts from: row 0 is 1..9, rows
/// within a band shift by 3, bands shift by 1.
pub const CANONICAL: [u8; CELL_COUNT] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, //
    4, 5, 6, 7, 8, 9, 1, 2, 3, //
    7, 8, 9, 1, 2, 3, 4, 5, 6, //
    2, 3, 4, 5, 6, 7, 8, 9, 1, //
    5, 6, 7, 8, 9, 1, 2, 3, 4, //
    8, 9, 1, 2, 3, 4, 5, 6, 7, //
    3, 4, 5, 6, 7, 8, 9, 1, 2, //
    6, 7, 8, 9, 1, 2, 3, 4, 5, //
    9, 1, 2, 3, 4, 5, 6, 7, 8, //
];

/// Chance that a whole-band (or whole-stack) swap is applied.
const BAND_SWAP_PROBABILITY: f64 = 0.6;

/// Puzzle difficulty, measured purely by how many cells are dug out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of cells removed from the solved grid (out of 81).
    pub fn hole_count(self) -> usize {
        match self {
            Self::Easy => 36,
            Self::Medium => 46,
            Self::Hard => 54,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A generated board pair: the answer key and the dug-out puzzle.
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    /// Complete valid grid, all cells marked given.
    pub solution: Grid,
    /// The solution with `hole_count` cells emptied; remaining cells are
    /// givens and agree with the solution.
    pub puzzle: Grid,
}

/// Sudoku puzzle generator.
pub struct Generator {
    rng: PcgRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: PcgRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed for reproducible boards.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: PcgRng::with_seed(seed),
        }
    }

    /// Produce a solution and a puzzle of the requested difficulty.
    pub fn generate(&mut self, difficulty: Difficulty) -> GeneratedPuzzle {
        let solution = self.randomize_canonical();
        let puzzle = self.dig_holes(solution, difficulty.hole_count());
        GeneratedPuzzle {
            solution: Grid::from_values(solution),
            puzzle: Grid::from_values(puzzle),
        }
    }

    /// Apply the validity-preserving transformation pipeline to the
    /// canonical grid.
    fn randomize_canonical(&mut self) -> [u8; CELL_COUNT] {
        let mut relabel: [u8; SIZE] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        self.rng.shuffle(&mut relabel);
        let mut board = relabel_digits(CANONICAL, relabel);

        // Rows may move freely within their own band of boxes.
        for band in 0..BOX_SIZE {
            let base = band * BOX_SIZE;
            let r1 = base + self.rng.next_usize(BOX_SIZE);
            let r2 = base + self.rng.next_usize(BOX_SIZE);
            board = swap_rows(board, r1, r2);
        }
        for stack in 0..BOX_SIZE {
            let base = stack * BOX_SIZE;
            let c1 = base + self.rng.next_usize(BOX_SIZE);
            let c2 = base + self.rng.next_usize(BOX_SIZE);
            board = swap_cols(board, c1, c2);
        }

        // Whole bands and stacks relocate intact, box groups and all.
        if self.rng.next_f64() < BAND_SWAP_PROBABILITY {
            let a = self.rng.next_usize(BOX_SIZE);
            let b = self.rng.next_usize(BOX_SIZE);
            for i in 0..BOX_SIZE {
                board = swap_rows(board, a * BOX_SIZE + i, b * BOX_SIZE + i);
            }
        }
        if self.rng.next_f64() < BAND_SWAP_PROBABILITY {
            let a = self.rng.next_usize(BOX_SIZE);
            let b = self.rng.next_usize(BOX_SIZE);
            for i in 0..BOX_SIZE {
                board = swap_cols(board, a * BOX_SIZE + i, b * BOX_SIZE + i);
            }
        }

        board
    }

    /// Zero out `holes` cells at uniformly shuffled positions.
    fn dig_holes(&mut self, solution: [u8; CELL_COUNT], holes: usize) -> [u8; CELL_COUNT] {
        let mut positions: Vec<usize> = (0..CELL_COUNT).collect();
        self.rng.shuffle(&mut positions);

        let mut puzzle = solution;
        for &idx in positions.iter().take(holes) {
            puzzle[idx] = 0;
        }
        puzzle
    }
}

/// Apply a digit relabeling map (`map[d - 1]` replaces digit `d`).
fn relabel_digits(board: [u8; CELL_COUNT], map: [u8; SIZE]) -> [u8; CELL_COUNT] {
    board.map(|v| map[(v - 1) as usize])
}

/// Exchange two rows, returning the new board.
fn swap_rows(mut board: [u8; CELL_COUNT], r1: usize, r2: usize) -> [u8; CELL_COUNT] {
    for col in 0..SIZE {
        board.swap(r1 * SIZE + col, r2 * SIZE + col);
    }
    board
}

/// Exchange two columns, returning the new board.
fn swap_cols(mut board: [u8; CELL_COUNT], c1: usize, c2: usize) -> [u8; CELL_COUNT] {
    for row in 0..SIZE {
        board.swap(row * SIZE + c1, row * SIZE + c2);
    }
    board
}

/// PCG-style PRNG (XSH-RR output over a 64-bit LCG). Seeded from the OS via
/// `getrandom`; keeps the engine free of a full RNG dependency and usable
/// from wasm.
struct PcgRng {
    state: u64,
}

const PCG_MULT: u64 = 6364136223846793005;
const PCG_INC: u64 = 1442695040888963407;

impl PcgRng {
    fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        if getrandom::getrandom(&mut bytes).is_err() {
            // Entropy source unavailable: fall back to a process-local
            // counter so generation still works, just less varied.
            use std::sync::atomic::{AtomicU64, Ordering};
            static FALLBACK: AtomicU64 = AtomicU64::new(0x9e37_79b9_7f4a_7c15);
            bytes = FALLBACK.fetch_add(0x9e37_79b9, Ordering::Relaxed).to_le_bytes();
        }
        Self::with_seed(u64::from_le_bytes(bytes))
    }

    fn with_seed(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(PCG_INC),
        };
        rng.next_u32();
        rng
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(PCG_MULT).wrapping_add(PCG_INC);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        self.next_u32() as usize % bound
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}
