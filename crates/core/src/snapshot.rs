use crate::pieces::Piece;
use crate::types::{Position, ShapeKind};

/// Broadcast view of one piece (shape, orientation, box, colour, bitmap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub orientation: usize,
    pub rows: usize,
    pub cols: usize,
    pub color: u32,
    pub cells: &'static [u8],
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind(),
            orientation: value.orientation(),
            rows: value.rows(),
            cols: value.cols(),
            color: value.color(),
            cells: value.cells(),
        }
    }
}

/// Full room state as seen by observers. Player roles are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<u32>,
    pub current: PieceSnapshot,
    pub position: Position,
    pub next: PieceSnapshot,
    pub cleared_lines: u32,
    pub level: u32,
    pub total_points: u32,
    pub running: bool,
    pub game_over: bool,
}
