//! Peer-constraint checks.
//!
//! A placement is checked against the 20 peers of its cell: the rest of its
//! row, column, and 3x3 box. Checks never mutate the grid; a conflicting
//! digit is flagged for display, not rejected, so the player can see and fix
//! it.

use crate::board::{Grid, BOX_SIZE, CELL_COUNT, SIZE};

/// True iff no peer of `idx` currently holds `value`. The cell at `idx`
/// itself is excluded, so a digit never conflicts with its own placement.
pub fn placement_fits(grid: &Grid, idx: usize, value: u8) -> bool {
    let row = idx / SIZE;
    let col = idx % SIZE;

    for i in 0..SIZE {
        let row_peer = row * SIZE + i;
        if row_peer != idx && grid.get(row_peer) == Some(value) {
            return false;
        }
        let col_peer = i * SIZE + col;
        if col_peer != idx && grid.get(col_peer) == Some(value) {
            return false;
        }
    }

    let band = (row / BOX_SIZE) * BOX_SIZE;
    let stack = (col / BOX_SIZE) * BOX_SIZE;
    for r in band..band + BOX_SIZE {
        for c in stack..stack + BOX_SIZE {
            let peer = r * SIZE + c;
            if peer != idx && grid.get(peer) == Some(value) {
                return false;
            }
        }
    }

    true
}

/// Indices of filled cells whose digit breaks the row/column/box constraint.
/// Used for conflict highlighting; never mutates.
pub fn conflicts(grid: &Grid) -> Vec<usize> {
    (0..CELL_COUNT)
        .filter(|&idx| match grid.get(idx) {
            Some(value) => !placement_fits(grid, idx, value),
            None => false,
        })
        .collect()
}
