//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of a cooperative falling-block game in which one
//! player moves the piece and the other rotates it. It has **no dependencies**
//! on networking, async runtimes or serialization: time and output reach it
//! only through the [`Timer`] and [`StateSink`] traits.
//!
//! # Module Structure
//!
//! - [`board`]: variable-size grid of colour cells, row insert / remove
//! - [`pieces`]: static shape table (box, orientation bitmaps, colour) and [`Piece`]
//! - [`validation`]: bounds and collision predicates, post-rotation correction
//! - [`mutations`]: freezing pieces, detecting and clearing completed lines
//! - [`scoring`]: line scores, level progression, drop period
//! - [`game_state`]: the drop loop and player commands
//! - [`roles`]: Mover / Rotator assignment, readiness, authorization
//! - [`room`]: event-driven room tying game, roles, timer and sink together
//! - [`snapshot`]: the broadcast view of a game
//! - [`rng`]: seedable generator for piece draws and role coin flips
//!
//! # Example
//!
//! ```
//! use tetrolyseus_core::{GameState, TickOutcome};
//!
//! let mut game = GameState::with_defaults(12345);
//! assert_eq!(game.tick(), TickOutcome::Idle); // not running yet
//!
//! game.start();
//! let row = game.position().row;
//! game.tick();
//! assert_eq!(game.position().row, row + 1);
//! ```

pub mod board;
pub mod game_state;
pub mod mutations;
pub mod pieces;
pub mod rng;
pub mod roles;
pub mod room;
pub mod scoring;
pub mod snapshot;
pub mod validation;

pub use tetrolyseus_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{DropStep, GameState, TickOutcome};
pub use pieces::{shape_spec, Piece, ShapeSpec};
pub use rng::SimpleRng;
pub use roles::{ConnectionId, Player, RoleManager};
pub use room::{Room, RoomEvent, RoomUpdate, StateSink, Timer, TimerHandle};
pub use scoring::{drop_period, level_for_lines, line_score};
pub use snapshot::{GameSnapshot, PieceSnapshot};
