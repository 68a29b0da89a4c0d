use crate::protocol::ErrorCode;

/// Invalid server configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Session-level protocol failures reported back to the client as `error` lines.
///
/// Game-level rejections (wrong role, blocked move) are never errors.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("send join before {command}")]
    JoinRequired { command: &'static str },

    #[error("already joined room {room}")]
    AlreadyJoined { room: String },

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl ProtocolError {
    /// Wire error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::Malformed(_) => ErrorCode::InvalidMessage,
            ProtocolError::JoinRequired { .. } => ErrorCode::JoinRequired,
            ProtocolError::AlreadyJoined { .. } => ErrorCode::AlreadyJoined,
            ProtocolError::LineTooLong { .. } => ErrorCode::LineTooLong,
        }
    }
}
