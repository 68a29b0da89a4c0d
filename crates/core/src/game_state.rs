//! Game state module - one room's board, pieces, score and the drop loop
//!
//! `GameState::tick` is the body of the periodic drop loop. It knows nothing
//! about timers: when a tick raises the level it reports the new level and the
//! room reschedules its timer. Player commands (`try_move`, `try_rotate`) are
//! validated here but not authorized; role checks belong to the room.

use crate::board::Board;
use crate::mutations::{clear_lines, detect_completed_lines, freeze_piece};
use crate::pieces::Piece;
use crate::rng::SimpleRng;
use crate::scoring::{level_for_lines, line_score};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{Movement, Position, DEFAULT_COLS, DEFAULT_LEVEL, DEFAULT_ROWS, DOWN, SPAWN_ROW};
use crate::validation::{bottom_out_of_bounds, collides_with_board, fits, keep_inside_bounds};

/// What the piece did during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropStep {
    /// Moved down one row
    Dropped,
    /// Could not drop; frozen into the board and replaced by the next piece
    Frozen,
}

/// Result of one drop-loop tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Game not running; nothing changed
    Idle,
    Advanced {
        step: DropStep,
        lines_cleared: usize,
        points: u32,
        /// New level when this tick crossed a level boundary
        level_up: Option<u32>,
    },
    /// The freshly spawned piece collided at its spawn position
    GameOver,
}

impl TickOutcome {
    pub fn level_up(&self) -> Option<u32> {
        match self {
            TickOutcome::Advanced { level_up, .. } => *level_up,
            _ => None,
        }
    }

    pub fn mutated(&self) -> bool {
        !matches!(self, TickOutcome::Idle)
    }
}

/// Complete game state of one room
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Piece,
    position: Position,
    next: Piece,
    /// Cumulative, never decreases
    cleared_lines: u32,
    level: u32,
    /// Cumulative, never decreases
    total_points: u32,
    running: bool,
    /// Terminal; a finished game never runs again
    game_over: bool,
    rng: SimpleRng,
}

impl GameState {
    /// Create a game on an empty `rows x cols` board
    pub fn new(rows: usize, cols: usize, level: u32, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let current = Piece::random(&mut rng);
        let next = Piece::random(&mut rng);
        let board = Board::new(rows, cols);
        let position = Self::spawn_position_for(&board);

        Self {
            board,
            current,
            position,
            next,
            cleared_lines: 0,
            level,
            total_points: 0,
            running: false,
            game_over: false,
            rng,
        }
    }

    /// Room defaults: 20 rows, 10 columns, level 0
    pub fn with_defaults(seed: u32) -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, DEFAULT_LEVEL, seed)
    }

    /// Build a game around an existing board and piece placement (not running)
    pub fn from_parts(
        board: Board,
        current: Piece,
        position: Position,
        next: Piece,
        seed: u32,
    ) -> Self {
        Self {
            board,
            current,
            position,
            next,
            cleared_lines: 0,
            level: DEFAULT_LEVEL,
            total_points: 0,
            running: false,
            game_over: false,
            rng: SimpleRng::new(seed),
        }
    }

    /// Preload progress counters (used when resuming a board mid-game)
    pub fn with_progress(mut self, cleared_lines: u32, total_points: u32) -> Self {
        self.cleared_lines = cleared_lines;
        self.level = level_for_lines(cleared_lines);
        self.total_points = total_points;
        self
    }

    fn spawn_position_for(board: &Board) -> Position {
        Position::new(SPAWN_ROW, (board.cols() / 2) as i32)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Piece {
        self.current
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn cleared_lines(&self) -> u32 {
        self.cleared_lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Begin running. Returns false if already running or the game is over.
    pub fn start(&mut self) -> bool {
        if self.running || self.game_over {
            return false;
        }
        self.running = true;
        true
    }

    /// One drop-loop tick: drop or freeze, then clear, score and level
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let candidate = self.position.offset(DOWN).filter(|&candidate| {
            !bottom_out_of_bounds(&self.board, &self.current, candidate)
                && !collides_with_board(&self.board, &self.current, candidate)
        });
        let step = if let Some(candidate) = candidate {
            self.position = candidate;
            DropStep::Dropped
        } else {
            freeze_piece(&mut self.board, &self.current, self.position);
            self.spawn_next();
            if collides_with_board(&self.board, &self.current, self.position) {
                self.running = false;
                self.game_over = true;
                return TickOutcome::GameOver;
            }
            DropStep::Frozen
        };

        let completed = detect_completed_lines(&self.board);
        let lines_cleared = completed.len();
        let points = line_score(lines_cleared, self.level);
        self.cleared_lines += lines_cleared as u32;
        self.total_points = self.total_points.saturating_add(points);
        clear_lines(&mut self.board, &completed);

        let next_level = level_for_lines(self.cleared_lines);
        let level_up = if next_level > self.level {
            self.level = next_level;
            Some(next_level)
        } else {
            None
        };

        TickOutcome::Advanced {
            step,
            lines_cleared,
            points,
            level_up,
        }
    }

    /// Promote the queued piece to current and draw a new queued piece
    fn spawn_next(&mut self) {
        self.current = self.next;
        self.position = Self::spawn_position_for(&self.board);
        self.next = Piece::random(&mut self.rng);
    }

    /// Translate the current piece by `delta` if the target fits.
    ///
    /// Returns whether the piece moved.
    pub fn try_move(&mut self, delta: Movement) -> bool {
        if !self.running {
            return false;
        }

        match self.position.offset(delta) {
            Some(candidate) if fits(&self.board, &self.current, candidate) => {
                self.position = candidate;
                true
            }
            _ => false,
        }
    }

    /// Rotate the current piece to its next orientation, kicking it back inside
    /// the walls and floor. Nothing changes if the corrected placement collides.
    ///
    /// Returns whether the piece rotated.
    pub fn try_rotate(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let rotated = self.current.rotate_next();
        let corrected = keep_inside_bounds(&self.board, &rotated, self.position);
        if collides_with_board(&self.board, &rotated, corrected) {
            return false;
        }
        self.current = rotated;
        self.position = corrected;
        true
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            rows: self.board.rows(),
            cols: self.board.cols(),
            cells: self.board.cells().to_vec(),
            current: PieceSnapshot::from(self.current),
            position: self.position,
            next: PieceSnapshot::from(self.next),
            cleared_lines: self.cleared_lines,
            level: self.level,
            total_points: self.total_points,
            running: self.running,
            game_over: self.game_over,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_defaults(1)
    }
}
