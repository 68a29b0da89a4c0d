//! Session layer - rooms over a TCP socket with a JSON line protocol
//!
//! Players connect over TCP, join a named room (created on first join,
//! disposed when the last player leaves) and steer the shared piece: the Mover
//! translates it, the Rotator rotates it. Every state change is broadcast to all
//! members of the room as a full snapshot.
//!
//! # Protocol Overview
//!
//! The server speaks a **line-delimited JSON protocol**:
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:2567)
//! 2. **Join**: Client sends `join`, server answers `welcome` with the assigned role
//!    followed by the current `state`
//! 3. **Ready**: Each player sends `ready`; the game starts once a Mover and a
//!    Rotator are present and everyone is ready
//! 4. **Play**: `move` / `rotate` from the right role change the piece; the drop
//!    loop advances it on its own timer
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **join**: `{"type":"join","room":"name"}` (room optional)
//! - **move**: `{"type":"move","row":0,"col":-1}` relative delta
//! - **rotate**: `{"type":"rotate"}`
//! - **ready**: `{"type":"ready","isReady":true}`
//!
//! ## Server → Client
//!
//! - **welcome**: connection id, room name and role
//! - **state**: full game snapshot
//! - **error**: session-level problem with `code` and `message`
//!
//! Inbound lines longer than [`server::MAX_LINE_BYTES`] get a `line_too_long`
//! error and the connection is closed.
//!
//! Commands from the wrong role or that do not fit on the board are dropped
//! without a reply; the unchanged next snapshot is the only signal.
//!
//! # Environment Variables
//!
//! See [`config`]: `TETROLYSEUS_HOST`, `TETROLYSEUS_PORT`,
//! `TETROLYSEUS_MAX_PENDING`, `TETROLYSEUS_DEFAULT_ROOM`.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"join","room":"lobby"}
//! Server -> Client: {"type":"welcome","client_id":1,"room":"lobby","role":"mover"}
//! Server -> Client: {"type":"state","board":{"rows":20,"cols":10,"cells":[...]},...}
//! Client -> Server: {"type":"ready","isReady":true}
//! Client -> Server: {"type":"move","row":0,"col":1}
//! Server -> Client: {"type":"state",...}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 2567
//! {"type":"join"}
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod room_task;
pub mod server;
pub mod timer;

pub use tetrolyseus_core as core;
pub use tetrolyseus_types as types;

pub use config::ServerConfig;
pub use error::{ConfigError, ProtocolError};
pub use protocol::*;
pub use room_task::{BroadcastSink, RoomHandle, RoomInput, RoomRegistry};
pub use server::run_server;
pub use timer::TokioTimer;
