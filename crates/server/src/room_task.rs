//! Room tasks - one tokio task per live room
//!
//! The task owns a [`Room`] and drains a bounded queue of [`RoomInput`]s one at
//! a time. Player messages, joins, leaves and timer ticks all travel through
//! that single queue, so the room sees them in one total order and the
//! snapshots it broadcasts follow that order.
//!
//! A room is created on the first join for its name and disposed when its last
//! player leaves. The [`RoomRegistry`] maps names to live rooms.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info};

use crate::core::{
    ConnectionId, GameSnapshot, Room, RoomEvent, RoomUpdate, StateSink, TickOutcome,
};
use crate::protocol::{create_state, create_welcome, ServerMessage};
use crate::timer::TokioTimer;
use crate::types::Role;

/// Per-connection outbound queue, drained by the connection's writer task
pub type Outbound = mpsc::UnboundedSender<ServerMessage>;

/// Item on a room's queue
#[derive(Debug)]
pub enum RoomInput {
    /// Seat a connection; the assigned role comes back on `reply`
    Join {
        id: ConnectionId,
        outbound: Outbound,
        reply: oneshot::Sender<Role>,
    },
    Event(RoomEvent),
}

/// Fans every published snapshot out to the room's members
#[derive(Default)]
pub struct BroadcastSink {
    members: HashMap<ConnectionId, Outbound>,
}

impl BroadcastSink {
    pub fn add(&mut self, id: ConnectionId, outbound: Outbound) {
        self.members.insert(id, outbound);
    }

    pub fn remove(&mut self, id: ConnectionId) {
        self.members.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl StateSink for BroadcastSink {
    fn publish(&mut self, snapshot: &GameSnapshot) {
        let msg = create_state(snapshot);
        for tx in self.members.values() {
            let _ = tx.send(msg.clone());
        }
    }
}

/// Sending side of a live room
#[derive(Debug, Clone)]
pub struct RoomHandle {
    pub name: String,
    /// Distinguishes successive rooms that reuse a name
    pub generation: u64,
    pub tx: mpsc::Sender<RoomInput>,
}

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<String, RoomHandle>,
    next_generation: u64,
}

/// Name -> live room map shared by all connections
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the live room called `name`, spawning it if there is none
    pub async fn join_or_create(&self, name: &str, max_pending: usize) -> RoomHandle {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = inner.rooms.get(name) {
            if !handle.tx.is_closed() {
                return handle.clone();
            }
        }

        inner.next_generation += 1;
        let generation = inner.next_generation;
        let handle = spawn_room(
            name.to_string(),
            generation,
            max_pending,
            self.clone(),
            fresh_seed(generation),
        );
        inner.rooms.insert(name.to_string(), handle.clone());
        handle
    }

    #[cfg(test)]
    async fn room_names(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        let mut names: Vec<String> = inner.rooms.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop `name` unless it has already been replaced by a newer room
    async fn remove(&self, name: &str, generation: u64) {
        let mut inner = self.inner.lock().await;
        if inner.rooms.get(name).map(|h| h.generation) == Some(generation) {
            inner.rooms.remove(name);
        }
    }
}

fn fresh_seed(generation: u64) -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
        .unwrap_or_default();
    (nanos ^ generation.wrapping_mul(0x9e37_79b9_7f4a_7c15)) as u32
}

fn spawn_room(
    name: String,
    generation: u64,
    max_pending: usize,
    registry: RoomRegistry,
    seed: u32,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(max_pending.max(1));
    let room = Room::new(seed, TokioTimer::new(tx.clone()), BroadcastSink::default());
    info!(room = %name, generation, "room created");

    tokio::spawn(run_room(name.clone(), generation, room, rx, registry));

    RoomHandle {
        name,
        generation,
        tx,
    }
}

async fn run_room(
    name: String,
    generation: u64,
    mut room: Room<TokioTimer, BroadcastSink>,
    mut rx: mpsc::Receiver<RoomInput>,
    registry: RoomRegistry,
) {
    while let Some(input) = rx.recv().await {
        match input {
            RoomInput::Join {
                id,
                outbound,
                reply,
            } => {
                let RoomUpdate::Joined(role) = room.handle(RoomEvent::Joined(id)) else {
                    continue;
                };
                info!(room = %name, client = id, role = role.as_str(), "player joined");
                let _ = outbound.send(create_welcome(id, &name, role));
                let _ = outbound.send(create_state(&room.snapshot()));
                room.sink_mut().add(id, outbound);
                let _ = reply.send(role);
            }
            RoomInput::Event(RoomEvent::Left(id)) => {
                room.sink_mut().remove(id);
                if let RoomUpdate::Left(Some(role)) = room.handle(RoomEvent::Left(id)) {
                    info!(room = %name, client = id, role = role.as_str(), "player left");
                }
                if room.is_empty() {
                    break;
                }
            }
            RoomInput::Event(event) => {
                let update = room.handle(event);
                log_update(&name, &event, &update, &room);
            }
        }
    }

    // Refuse new joins first; anyone queued behind the last leave re-resolves
    // the room through the registry and gets a fresh one.
    rx.close();
    registry.remove(&name, generation).await;
    room.dispose();
    info!(room = %name, generation, "room disposed");
}

fn log_update(
    name: &str,
    event: &RoomEvent,
    update: &RoomUpdate,
    room: &Room<TokioTimer, BroadcastSink>,
) {
    match update {
        RoomUpdate::Started => {
            info!(room = %name, level = room.game().level(), "game started");
        }
        RoomUpdate::Ticked(TickOutcome::GameOver) => {
            info!(
                room = %name,
                points = room.game().total_points(),
                lines = room.game().cleared_lines(),
                "game over"
            );
        }
        RoomUpdate::Ticked(TickOutcome::Advanced {
            lines_cleared,
            points,
            level_up,
            ..
        }) => {
            if *lines_cleared > 0 {
                debug!(room = %name, lines = lines_cleared, points, "lines cleared");
            }
            if let Some(level) = level_up {
                info!(room = %name, level, "level up");
            }
        }
        RoomUpdate::Rejected => {
            debug!(room = %name, ?event, "command dropped");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn test_broadcast_sink_fans_out() {
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let mut sink = BroadcastSink::default();
        sink.add(1, tx_a);
        sink.add(2, tx_b);
        assert_eq!(sink.len(), 2);

        let snapshot = GameState::with_defaults(3).snapshot();
        sink.publish(&snapshot);
        assert_eq!(rx_a.try_recv().unwrap(), create_state(&snapshot));
        assert_eq!(rx_b.try_recv().unwrap(), create_state(&snapshot));

        sink.remove(1);
        sink.publish(&snapshot);
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_room_lifecycle() {
        let registry = RoomRegistry::new();
        let handle = registry.join_or_create("lobby", 8).await;
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .tx
            .send(RoomInput::Join {
                id: 1,
                outbound: out_tx,
                reply: reply_tx,
            })
            .await
            .unwrap();
        let role = reply_rx.await.unwrap();

        match out_rx.recv().await.unwrap() {
            ServerMessage::Welcome(w) => {
                assert_eq!(w.client_id, 1);
                assert_eq!(w.room, "lobby");
                assert_eq!(Role::from(w.role), role);
            }
            other => panic!("expected welcome, got {:?}", other),
        }
        assert!(matches!(out_rx.recv().await.unwrap(), ServerMessage::State(_)));

        // Same name resolves to the same room
        let again = registry.join_or_create("lobby", 8).await;
        assert_eq!(again.generation, handle.generation);
        assert_eq!(registry.room_names().await, vec!["lobby".to_string()]);

        handle
            .tx
            .send(RoomInput::Event(RoomEvent::Left(1)))
            .await
            .unwrap();
        // Writer side sees the room drop its sender
        assert!(out_rx.recv().await.is_none());

        tokio::time::timeout(std::time::Duration::from_secs(1), handle.tx.closed())
            .await
            .unwrap();
        let fresh = registry.join_or_create("lobby", 8).await;
        assert_ne!(fresh.generation, handle.generation);
    }
}
