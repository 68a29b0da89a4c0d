//! Board module - the playfield grid
//!
//! The board is a `rows x cols` grid stored as a flat row-major vector
//! (`index = row * cols + col`). A cell value of 0 is empty; any other value is
//! occupied and doubles as the colour of the piece that filled it.
//!
//! Row 0 is the top of the board. Rows are removed and inserted as whole
//! slices, so the length always stays `rows * cols`.

use crate::types::{DEFAULT_COLS, DEFAULT_ROWS};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<u32>,
}

impl Board {
    /// Create an empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be positive");
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Build a board from row slices (row 0 first)
    pub fn from_rows(rows: &[&[u32]]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        assert!(rows.iter().all(|r| r.len() == cols), "ragged board rows");
        let mut board = Self::new(rows.len(), cols);
        for (row, values) in rows.iter().enumerate() {
            let start = row * cols;
            board.cells[start..start + cols].copy_from_slice(values);
        }
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Cell value at (row, col). The caller guarantees the coordinate is on the board.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> u32 {
        self.cells[self.index(row, col)]
    }

    /// Overwrite the cell at (row, col). The caller guarantees the coordinate is on the board.
    #[inline]
    pub fn set_cell(&mut self, row: usize, col: usize, value: u32) {
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Whether a signed coordinate lies on the board
    #[inline]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        (0..self.rows as i64).contains(&row) && (0..self.cols as i64).contains(&col)
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Every cell of the row is occupied
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|&cell| cell != 0)
    }

    /// Every cell of the row is empty
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.row(row).iter().all(|&cell| cell == 0)
    }

    /// Prepend a zero-filled row; everything below shifts down by one row
    pub fn insert_empty_row_at_top(&mut self) {
        self.cells.splice(0..0, std::iter::repeat(0).take(self.cols));
    }

    /// Delete one row; everything above it shifts up in the flat layout.
    ///
    /// Callers pair this with `insert_empty_row_at_top` so the dimensions hold.
    pub fn remove_row(&mut self, row: usize) {
        let start = row * self.cols;
        self.cells.drain(start..start + self.cols);
    }

    /// Raw cells in row-major order
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(20, 10);
        assert_eq!(board.index(0, 0), 0);
        assert_eq!(board.index(0, 9), 9);
        assert_eq!(board.index(1, 0), 10);
        assert_eq!(board.index(19, 9), 199);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new(20, 10);
        board.set_cell(0, 0, 7);
        board.set_cell(10, 5, 3);

        assert_eq!(board.cell_at(0, 0), 7);
        assert_eq!(board.cell_at(10, 5), 3);
        assert_eq!(board.cells[0], 7);
        assert_eq!(board.cells[10 * 10 + 5], 3);
    }

    #[test]
    fn test_contains() {
        let board = Board::new(4, 3);
        assert!(board.contains(0, 0));
        assert!(board.contains(3, 2));
        assert!(!board.contains(-1, 0));
        assert!(!board.contains(0, -1));
        assert!(!board.contains(4, 0));
        assert!(!board.contains(0, 3));
    }

    #[test]
    fn test_insert_and_remove_keep_length() {
        let mut board = Board::from_rows(&[&[1, 1], &[2, 0], &[3, 3]]);

        board.remove_row(1);
        assert_eq!(board.cells().len(), 4);
        board.insert_empty_row_at_top();
        assert_eq!(board.cells().len(), 6);

        assert_eq!(board.row(0), &[0, 0]);
        assert_eq!(board.row(1), &[1, 1]);
        assert_eq!(board.row(2), &[3, 3]);
    }

    #[test]
    fn test_row_predicates() {
        let board = Board::from_rows(&[&[0, 0, 0], &[1, 0, 2], &[4, 5, 6]]);
        assert!(board.is_row_empty(0));
        assert!(!board.is_row_full(0));
        assert!(!board.is_row_empty(1));
        assert!(!board.is_row_full(1));
        assert!(board.is_row_full(2));
        assert!(!board.is_row_empty(2));
    }
}
