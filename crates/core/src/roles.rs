//! Roles module - who is in the room, what they may do, and when play starts
//!
//! Assignment rules:
//! - first joiner into an empty room: coin flip between Mover and Rotator
//! - every later joiner: Rotator if a Mover is present, otherwise Mover
//!
//! So the third and later joiners always become Rotators. Roles are never
//! rebalanced, not even when a player leaves.

use crate::rng::SimpleRng;
use crate::types::{Command, Role};

/// Opaque per-connection id handed out by the session layer
pub type ConnectionId = u64;

/// One seated player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: ConnectionId,
    pub role: Role,
    pub ready: bool,
}

/// Room-scoped player table keyed by connection id, in join order
#[derive(Debug, Clone)]
pub struct RoleManager {
    players: Vec<Player>,
    rng: SimpleRng,
}

impl RoleManager {
    pub fn new(seed: u32) -> Self {
        Self {
            players: Vec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Seat a player and return their role.
    ///
    /// A second join for an id that is already seated changes nothing and
    /// returns the existing role.
    pub fn join(&mut self, id: ConnectionId) -> Role {
        if let Some(existing) = self.role_of(id) {
            return existing;
        }

        let role = if self.players.is_empty() {
            if self.rng.next_bool() {
                Role::Mover
            } else {
                Role::Rotator
            }
        } else if self.has_role(Role::Mover) {
            Role::Rotator
        } else {
            Role::Mover
        };

        self.players.push(Player {
            id,
            role,
            ready: false,
        });
        role
    }

    /// Remove a player. Remaining players keep their roles.
    pub fn leave(&mut self, id: ConnectionId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    /// Set readiness; returns false for unknown ids
    pub fn set_ready(&mut self, id: ConnectionId, ready: bool) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.ready = ready;
                true
            }
            None => false,
        }
    }

    /// At least one Mover, at least one Rotator, and everyone ready
    pub fn can_start(&self) -> bool {
        self.has_role(Role::Mover)
            && self.has_role(Role::Rotator)
            && self.players.iter().all(|p| p.ready)
    }

    /// Whether `id` is seated and its role may issue `command`
    pub fn is_authorized(&self, id: ConnectionId, command: &Command) -> bool {
        self.role_of(id)
            .map(|role| role.may_issue(command))
            .unwrap_or(false)
    }

    pub fn role_of(&self, id: ConnectionId) -> Option<Role> {
        self.players.iter().find(|p| p.id == id).map(|p| p.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.players.iter().any(|p| p.role == role)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
}

impl Default for RoleManager {
    fn default() -> Self {
        Self::new(1)
    }
}
