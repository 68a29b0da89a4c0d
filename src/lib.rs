//! Tetrolyseus (workspace facade crate).
//!
//! Re-exports the member crates as `tetrolyseus::{core,server,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tetrolyseus_core as core;
pub use tetrolyseus_server as server;
pub use tetrolyseus_types as types;
