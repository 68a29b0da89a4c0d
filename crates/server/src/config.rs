//! Server configuration from environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TETROLYSEUS_HOST` | `127.0.0.1` | Bind address |
//! | `TETROLYSEUS_PORT` | `2567` | Port number (0 picks a free port) |
//! | `TETROLYSEUS_MAX_PENDING` | `64` | Bound of each room's inbound event queue |
//! | `TETROLYSEUS_DEFAULT_ROOM` | `tetrolyseus` | Room joined when `join` names none |

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

pub const HOST_VAR: &str = "TETROLYSEUS_HOST";
pub const PORT_VAR: &str = "TETROLYSEUS_PORT";
pub const MAX_PENDING_VAR: &str = "TETROLYSEUS_MAX_PENDING";
pub const DEFAULT_ROOM_VAR: &str = "TETROLYSEUS_DEFAULT_ROOM";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending: usize,
    pub default_room: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2567,
            max_pending: 64,
            default_room: "tetrolyseus".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Create from an arbitrary variable source; unset variables take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup(HOST_VAR) {
            Some(value) => non_empty(HOST_VAR, value)?,
            None => defaults.host,
        };
        let port = parse_var(&lookup, PORT_VAR)?.unwrap_or(defaults.port);
        let max_pending = parse_var(&lookup, MAX_PENDING_VAR)?.unwrap_or(defaults.max_pending);
        if max_pending == 0 {
            return Err(ConfigError::InvalidValue {
                var: MAX_PENDING_VAR,
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let default_room = match lookup(DEFAULT_ROOM_VAR) {
            Some(value) => non_empty(DEFAULT_ROOM_VAR, value)?,
            None => defaults.default_room,
        };

        Ok(Self {
            host,
            port,
            max_pending,
            default_room,
        })
    }

    /// `host:port`, resolved when the listener binds
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })
}
