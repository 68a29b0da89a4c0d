//! Protocol module - line-delimited JSON messages
//!
//! Every message is one JSON object per line, tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::core::{ConnectionId, GameSnapshot, PieceSnapshot};
use crate::error::ProtocolError;
use crate::types::{Command, Movement, Role, ShapeKind};

// ============== Client -> Server Messages ==============

/// Inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Join (or create) a room; must be the first message on a connection
    Join {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },
    /// Relative translation of the current piece
    Move { row: i32, col: i32 },
    Rotate,
    Ready {
        #[serde(rename = "isReady")]
        is_ready: bool,
    },
}

impl ClientMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Move { .. } => "move",
            ClientMessage::Rotate => "rotate",
            ClientMessage::Ready { .. } => "ready",
        }
    }

    /// The room command carried by this message (`join` carries none)
    pub fn command(&self) -> Option<Command> {
        match *self {
            ClientMessage::Join { .. } => None,
            ClientMessage::Move { row, col } => Some(Command::Move(Movement::new(row, col))),
            ClientMessage::Rotate => Some(Command::Rotate),
            ClientMessage::Ready { is_ready } => Some(Command::Ready(is_ready)),
        }
    }
}

// ============== Server -> Client Messages ==============

/// Outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    State(StateMessage),
    Error(ErrorMessage),
}

/// Sent once to the joiner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub client_id: ConnectionId,
    pub room: String,
    pub role: RoleName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    #[serde(rename = "mover")]
    Mover,
    #[serde(rename = "rotator")]
    Rotator,
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Mover => RoleName::Mover,
            Role::Rotator => RoleName::Rotator,
        }
    }
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Mover => Role::Mover,
            RoleName::Rotator => Role::Rotator,
        }
    }
}

/// Full game snapshot broadcast to every member after each mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    pub board: BoardView,
    pub current: PieceView,
    pub position: PositionView,
    pub next: PieceView,
    #[serde(rename = "clearedLines")]
    pub cleared_lines: u32,
    pub level: u32,
    #[serde(rename = "totalPoints")]
    pub total_points: u32,
    pub running: bool,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: usize,
    pub cols: usize,
    /// Row-major, 0 = empty, otherwise the RGB colour of the frozen piece
    pub cells: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: ShapeName,
    pub orientation: usize,
    pub rows: usize,
    pub cols: usize,
    pub color: u32,
    pub cells: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub row: i32,
    pub col: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeName {
    #[serde(rename = "o")]
    O,
    #[serde(rename = "t")]
    T,
    #[serde(rename = "i")]
    I,
    #[serde(rename = "z")]
    Z,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "l")]
    L,
    #[serde(rename = "j")]
    J,
}

impl From<ShapeKind> for ShapeName {
    fn from(value: ShapeKind) -> Self {
        match value {
            ShapeKind::O => ShapeName::O,
            ShapeKind::T => ShapeName::T,
            ShapeKind::I => ShapeName::I,
            ShapeKind::Z => ShapeName::Z,
            ShapeKind::S => ShapeName::S,
            ShapeKind::L => ShapeName::L,
            ShapeKind::J => ShapeName::J,
        }
    }
}

impl From<&PieceSnapshot> for PieceView {
    fn from(value: &PieceSnapshot) -> Self {
        Self {
            kind: value.kind.into(),
            orientation: value.orientation,
            rows: value.rows,
            cols: value.cols,
            color: value.color,
            cells: value.cells.to_vec(),
        }
    }
}

impl From<&GameSnapshot> for StateMessage {
    fn from(value: &GameSnapshot) -> Self {
        Self {
            board: BoardView {
                rows: value.rows,
                cols: value.cols,
                cells: value.cells.clone(),
            },
            current: PieceView::from(&value.current),
            position: PositionView {
                row: value.position.row,
                col: value.position.col,
            },
            next: PieceView::from(&value.next),
            cleared_lines: value.cleared_lines,
            level: value.level,
            total_points: value.total_points,
            running: value.running,
            game_over: value.game_over,
        }
    }
}

/// Error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_message")]
    InvalidMessage,
    #[serde(rename = "join_required")]
    JoinRequired,
    #[serde(rename = "already_joined")]
    AlreadyJoined,
    #[serde(rename = "line_too_long")]
    LineTooLong,
}

// ============== Message Parsing ==============

/// Parse one inbound line
pub fn parse_message(json: &str) -> Result<ClientMessage, ProtocolError> {
    Ok(serde_json::from_str(json)?)
}

// ============== Utility Functions ==============

pub fn create_welcome(client_id: ConnectionId, room: &str, role: Role) -> ServerMessage {
    ServerMessage::Welcome(WelcomeMessage {
        client_id,
        room: room.to_string(),
        role: role.into(),
    })
}

pub fn create_state(snapshot: &GameSnapshot) -> ServerMessage {
    ServerMessage::State(StateMessage::from(snapshot))
}

pub fn create_error(code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        code,
        message: message.to_string(),
    })
}

impl From<&ProtocolError> for ServerMessage {
    fn from(value: &ProtocolError) -> Self {
        create_error(value.code(), &value.to_string())
    }
}
