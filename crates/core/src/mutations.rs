//! Mutations module - freezing pieces and clearing completed lines

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::Position;

/// Write the piece's colour into every board cell under an occupied piece cell.
///
/// Cells whose absolute coordinate is off the board are dropped.
pub fn freeze_piece(board: &mut Board, piece: &Piece, position: Position) {
    let color = piece.color();
    for (row, col) in piece.occupied() {
        let abs_row = i64::from(position.row) + row as i64;
        let abs_col = i64::from(position.col) + col as i64;
        if board.contains(abs_row, abs_col) {
            board.set_cell(abs_row as usize, abs_col as usize, color);
        }
    }
}

/// Indices of completed rows, bottom-most first (strictly descending).
///
/// Scans upward from the floor and stops at the first fully empty row; nothing
/// above an empty row can be reached by a falling piece. Partially filled rows
/// are skipped without ending the scan.
pub fn detect_completed_lines(board: &Board) -> Vec<usize> {
    let mut completed = Vec::new();
    for row in (0..board.rows()).rev() {
        if board.is_row_empty(row) {
            break;
        }
        if board.is_row_full(row) {
            completed.push(row);
        }
    }
    completed
}

/// Remove the given rows and prepend as many empty rows.
///
/// `completed` must be descending, as produced by [`detect_completed_lines`].
/// Each removal plus top insert shifts everything above the removed row down
/// by one, so the i-th index is corrected by `+ i`.
pub fn clear_lines(board: &mut Board, completed: &[usize]) {
    for (i, &row) in completed.iter().enumerate() {
        board.remove_row(row + i);
        board.insert_empty_row_at_top();
    }
}
