//! Tetrolyseus game server (default binary).
//!
//! Reads its configuration from the environment, installs a `tracing`
//! subscriber (filter via `RUST_LOG`, default `info`) and serves rooms until
//! the process is stopped.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tetrolyseus::server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        default_room = %config.default_room,
        "starting server"
    );

    tokio::select! {
        result = run_server(config, None) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
