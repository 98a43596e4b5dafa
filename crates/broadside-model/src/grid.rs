//! Grid addressing for the game board.
//!
//! The board is a square grid addressed by a single linear index in
//! row-major order. Every placement and adjacency computation in the
//! workspace goes through these helpers so the same width is used
//! everywhere — mixing widths corrupts every index on the board.

/// Side length of the board. All cell indices are relative to this width.
pub const GRID_WIDTH: usize = 10;

/// Total number of cells on the board.
pub const GRID_CELLS: usize = GRID_WIDTH * GRID_WIDTH;

/// Row of a linear cell index.
pub fn row(index: usize) -> usize {
    index / GRID_WIDTH
}

/// Column of a linear cell index.
pub fn col(index: usize) -> usize {
    index % GRID_WIDTH
}

/// Returns `true` if the index addresses a cell on the board.
pub fn in_bounds(index: usize) -> bool {
    index < GRID_CELLS
}

/// Linear index of a (row, col) pair. Callers must pass on-board values.
pub fn index_of(row: usize, col: usize) -> usize {
    row * GRID_WIDTH + col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_round_trip() {
        for i in 0..GRID_CELLS {
            assert_eq!(index_of(row(i), col(i)), i);
        }
    }

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(0));
        assert!(in_bounds(GRID_CELLS - 1));
        assert!(!in_bounds(GRID_CELLS));
    }

    #[test]
    fn test_row_boundaries() {
        assert_eq!(row(9), 0);
        assert_eq!(row(10), 1);
        assert_eq!(col(10), 0);
        assert_eq!(row(99), 9);
    }
}
