//! Room module - one game room as a single-threaded event processor
//!
//! A [`Room`] owns the game state, the role table, a periodic [`Timer`] and a
//! [`StateSink`]. Every join, leave, player command and timer tick reaches it
//! as a [`RoomEvent`] and is processed to completion by [`Room::handle`], so a
//! room never needs locking. The session layer decides how events are queued.
//!
//! Timer rules:
//! - the drop loop is (re)scheduled only on cooperative start and on level up,
//!   always as cancel-then-schedule
//! - game over cancels the timer for good
//! - a tick carrying any handle other than the live one is dropped

use std::time::Duration;

use crate::game_state::{GameState, TickOutcome};
use crate::roles::{ConnectionId, RoleManager};
use crate::scoring::drop_period;
use crate::snapshot::GameSnapshot;
use crate::types::{Command, Role};

/// Id of one scheduled periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Periodic scheduling collaborator.
///
/// Cancelling a handle must guarantee no further tick for it is handled; the
/// room additionally ignores ticks whose handle is no longer live.
pub trait Timer {
    fn schedule_periodic(&mut self, period: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Receives a snapshot after every state mutation, in event order
pub trait StateSink {
    fn publish(&mut self, snapshot: &GameSnapshot);
}

/// Everything that can happen to a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    Joined(ConnectionId),
    Left(ConnectionId),
    Message(ConnectionId, Command),
    Tick(TimerHandle),
}

/// What handling one event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomUpdate {
    Joined(Role),
    /// Role of the player that left, if it was seated
    Left(Option<Role>),
    /// Readiness recorded and the game started
    Started,
    /// Command accepted and applied
    Applied,
    /// Command from an unknown or unauthorized sender, or geometrically invalid
    Rejected,
    Ticked(TickOutcome),
    StaleTick,
}

pub struct Room<T: Timer, S: StateSink> {
    game: GameState,
    roles: RoleManager,
    timer: T,
    sink: S,
    active_timer: Option<TimerHandle>,
}

impl<T: Timer, S: StateSink> Room<T, S> {
    /// Default 20x10 room at level 0. `seed` drives pieces and role coin flips.
    pub fn new(seed: u32, timer: T, sink: S) -> Self {
        Self::with_parts(
            GameState::with_defaults(seed),
            RoleManager::new(seed.rotate_left(16) ^ 0x9e37_79b9),
            timer,
            sink,
        )
    }

    pub fn with_parts(game: GameState, roles: RoleManager, timer: T, sink: S) -> Self {
        Self {
            game,
            roles,
            timer,
            sink,
            active_timer: None,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn roles(&self) -> &RoleManager {
        &self.roles
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Handle of the live drop-loop timer
    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.active_timer
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: RoomEvent) -> RoomUpdate {
        match event {
            RoomEvent::Joined(id) => {
                let role = self.roles.join(id);
                self.publish();
                RoomUpdate::Joined(role)
            }
            RoomEvent::Left(id) => RoomUpdate::Left(self.roles.leave(id).map(|p| p.role)),
            RoomEvent::Message(id, command) => self.on_message(id, command),
            RoomEvent::Tick(handle) => self.on_tick(handle),
        }
    }

    fn on_message(&mut self, id: ConnectionId, command: Command) -> RoomUpdate {
        if !self.roles.is_authorized(id, &command) {
            return RoomUpdate::Rejected;
        }

        match command {
            Command::Ready(ready) => {
                self.roles.set_ready(id, ready);
                if self.roles.can_start() && self.game.start() {
                    self.restart_timer();
                    self.publish();
                    return RoomUpdate::Started;
                }
                RoomUpdate::Applied
            }
            Command::Move(delta) => self.applied_if(|game| game.try_move(delta)),
            Command::Rotate => self.applied_if(GameState::try_rotate),
        }
    }

    fn applied_if(&mut self, apply: impl FnOnce(&mut GameState) -> bool) -> RoomUpdate {
        if apply(&mut self.game) {
            self.publish();
            RoomUpdate::Applied
        } else {
            RoomUpdate::Rejected
        }
    }

    fn on_tick(&mut self, handle: TimerHandle) -> RoomUpdate {
        if self.active_timer != Some(handle) {
            return RoomUpdate::StaleTick;
        }

        let outcome = self.game.tick();
        match outcome {
            TickOutcome::GameOver => self.stop_timer(),
            _ => {
                if outcome.level_up().is_some() {
                    self.restart_timer();
                }
            }
        }
        if outcome.mutated() {
            self.publish();
        }
        RoomUpdate::Ticked(outcome)
    }

    /// Cancel any live timer, then schedule one at the current level's period
    fn restart_timer(&mut self) {
        self.stop_timer();
        let period = drop_period(self.game.level());
        self.active_timer = Some(self.timer.schedule_periodic(period));
    }

    fn stop_timer(&mut self) {
        if let Some(handle) = self.active_timer.take() {
            self.timer.cancel(handle);
        }
    }

    /// Tear the room down; the timer is cancelled
    pub fn dispose(&mut self) {
        self.stop_timer();
    }

    fn publish(&mut self) {
        let snapshot = self.game.snapshot();
        self.sink.publish(&snapshot);
    }
}
