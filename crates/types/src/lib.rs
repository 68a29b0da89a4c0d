//! Shared types - plain data used by the simulation core and the session layer
//!
//! Everything in here is a pure data structure with no dependencies, so it can be
//! used by the core rules, the wire protocol and the tests alike.
//!
//! # Room defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_ROWS` | 20 | Board height for a new room |
//! | `DEFAULT_COLS` | 10 | Board width for a new room |
//! | `DEFAULT_LEVEL` | 0 | Starting level |
//! | `BASE_DROP_MS` | 1000 | Drop period at level 0 |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |
//!
//! The drop period at level `n` is `BASE_DROP_MS / (n + 1)`.
//!
//! # Examples
//!
//! ```
//! use tetrolyseus_types::{Command, Position, Role, ShapeKind, LEFT};
//!
//! let kind = ShapeKind::from_str("t").unwrap();
//! assert_eq!(kind, ShapeKind::T);
//! assert_eq!(kind.as_str(), "t");
//!
//! let moved = Position::new(0, 5).offset(LEFT);
//! assert_eq!(moved, Some(Position::new(0, 4)));
//!
//! assert!(Role::Mover.may_issue(&Command::Move(LEFT)));
//! assert!(!Role::Rotator.may_issue(&Command::Move(LEFT)));
//! ```

/// Board height of a freshly created room
pub const DEFAULT_ROWS: usize = 20;

/// Board width of a freshly created room
pub const DEFAULT_COLS: usize = 10;

/// Level a room starts at
pub const DEFAULT_LEVEL: u32 = 0;

/// Drop period at level 0 (milliseconds)
pub const BASE_DROP_MS: u64 = 1000;

/// Cleared lines per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Row new pieces spawn on
pub const SPAWN_ROW: i32 = 0;

/// Base score by number of simultaneously cleared lines (index = count)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// The seven falling shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    T,
    I,
    Z,
    S,
    L,
    J,
}

impl ShapeKind {
    /// All kinds, in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::I,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::L,
        ShapeKind::J,
    ];

    /// Parse shape kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "i" => Some(ShapeKind::I),
            "z" => Some(ShapeKind::Z),
            "s" => Some(ShapeKind::S),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::I => "i",
            ShapeKind::Z => "z",
            ShapeKind::S => "s",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
        }
    }
}

/// Cooperative player roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Mover,
    Rotator,
}

impl Role {
    /// The other role
    pub fn opposite(&self) -> Self {
        match self {
            Role::Mover => Role::Rotator,
            Role::Rotator => Role::Mover,
        }
    }

    /// Whether a player holding this role may issue `command`.
    ///
    /// `ready` is open to everyone; `move` and `rotate` each belong to one role.
    pub fn may_issue(&self, command: &Command) -> bool {
        match command {
            Command::Move(_) => *self == Role::Mover,
            Command::Rotate => *self == Role::Rotator,
            Command::Ready(_) => true,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mover => "mover",
            Role::Rotator => "rotator",
        }
    }
}

/// Board coordinate of a piece's bounding-box top-left corner.
///
/// Signed on purpose: a position may sit off the board until a correction pass
/// pulls it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Translate by a movement delta, `None` if either coordinate overflows
    pub fn offset(self, delta: Movement) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(delta.row)?,
            col: self.col.checked_add(delta.col)?,
        })
    }
}

/// Relative translation requested by a `move` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Movement {
    pub row: i32,
    pub col: i32,
}

impl Movement {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

pub const LEFT: Movement = Movement::new(0, -1);
pub const RIGHT: Movement = Movement::new(0, 1);
pub const DOWN: Movement = Movement::new(1, 0);

/// Player command delivered to a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Translate the current piece (Mover only)
    Move(Movement),
    /// Advance the current piece to its next orientation (Rotator only)
    Rotate,
    /// Set the sender's readiness
    Ready(bool),
}

impl Command {
    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Move(_) => "move",
            Command::Rotate => "rotate",
            Command::Ready(_) => "ready",
        }
    }
}
