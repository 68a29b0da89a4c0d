//! Validation module - pure bounds and collision predicates
//!
//! All predicates take `(board, piece, position)` and never mutate anything.
//! The out-of-bounds checks only look at the slice of the piece's bounding box
//! that hangs over the respective edge: a piece whose box overhangs the wall
//! but whose occupied cells are all still on the board is in bounds.
//!
//! Coordinates are widened to `i64` before any arithmetic so that positions
//! near the `i32` limits are judged instead of overflowing.
//!
//! There is deliberately no top-edge predicate. A piece may sit above row 0
//! and nothing pulls it back down.

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::Position;

/// Any occupied cell in the local columns that hang over the left wall
pub fn left_out_of_bounds(_board: &Board, piece: &Piece, position: Position) -> bool {
    if position.col >= 0 {
        return false;
    }

    let offset = (-i64::from(position.col)).min(piece.cols() as i64) as usize;
    (0..offset).any(|col| (0..piece.rows()).any(|row| piece.cell(row, col) != 0))
}

/// Any occupied cell in the local columns that hang over the right wall
pub fn right_out_of_bounds(board: &Board, piece: &Piece, position: Position) -> bool {
    let piece_cols = piece.cols() as i64;
    let end = i64::from(position.col) + piece_cols;
    if end < board.cols() as i64 {
        return false;
    }

    let overhang = end - board.cols() as i64;
    let offset = piece_cols - 1 - overhang;
    let first = (offset + 1).max(0) as usize;
    (first..piece.cols())
        .rev()
        .any(|col| (0..piece.rows()).any(|row| piece.cell(row, col) != 0))
}

/// Any occupied cell in the local rows that hang below the floor
pub fn bottom_out_of_bounds(board: &Board, piece: &Piece, position: Position) -> bool {
    let piece_rows = piece.rows() as i64;
    let end = i64::from(position.row) + piece_rows;
    if end < board.rows() as i64 {
        return false;
    }

    let overhang = end - board.rows() as i64;
    let offset = piece_rows - 1 - overhang;
    let first = (offset + 1).max(0) as usize;
    (first..piece.rows())
        .rev()
        .any(|row| (0..piece.cols()).any(|col| piece.cell(row, col) != 0))
}

/// An occupied piece cell lands on an occupied board cell.
///
/// Only coordinates that exist on the board are compared; off-board cells are
/// the business of the bounds predicates.
pub fn collides_with_board(board: &Board, piece: &Piece, position: Position) -> bool {
    piece.occupied().any(|(row, col)| {
        let abs_row = i64::from(position.row) + row as i64;
        let abs_col = i64::from(position.col) + col as i64;
        board.contains(abs_row, abs_col) && board.cell_at(abs_row as usize, abs_col as usize) != 0
    })
}

/// In bounds on the left, right and bottom, and free of collisions
pub fn fits(board: &Board, piece: &Piece, position: Position) -> bool {
    !left_out_of_bounds(board, piece, position)
        && !right_out_of_bounds(board, piece, position)
        && !bottom_out_of_bounds(board, piece, position)
        && !collides_with_board(board, piece, position)
}

/// Push a position back onto the board after a rotation.
///
/// Shifts right while overhanging the left wall, then left while overhanging
/// the right wall, then up while overhanging the floor. The order is fixed.
pub fn keep_inside_bounds(board: &Board, piece: &Piece, position: Position) -> Position {
    let mut corrected = position;
    while left_out_of_bounds(board, piece, corrected) {
        corrected.col += 1;
    }
    while right_out_of_bounds(board, piece, corrected) {
        corrected.col -= 1;
    }
    while bottom_out_of_bounds(board, piece, corrected) {
        corrected.row -= 1;
    }
    corrected
}
