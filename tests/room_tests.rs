//! Room tests - roles, readiness and the timer-driven loop with a manual clock

use std::time::Duration;

use tetrolyseus::core::{
    Board, GameSnapshot, GameState, Piece, RoleManager, Room, RoomEvent, RoomUpdate, StateSink,
    TickOutcome, Timer, TimerHandle,
};
use tetrolyseus::types::{Command, Movement, Position, Role, ShapeKind, LEFT, RIGHT};

/// Timer that only records what the room asked for
#[derive(Default)]
struct ManualTimer {
    next: u64,
    live: Vec<(TimerHandle, Duration)>,
    history: Vec<Duration>,
    cancels: usize,
}

impl Timer for ManualTimer {
    fn schedule_periodic(&mut self, period: Duration) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.live.push((handle, period));
        self.history.push(period);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.live.retain(|(h, _)| *h != handle);
        self.cancels += 1;
    }
}

#[derive(Default)]
struct RecordingSink {
    snapshots: Vec<GameSnapshot>,
}

impl StateSink for RecordingSink {
    fn publish(&mut self, snapshot: &GameSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

type TestRoom = Room<ManualTimer, RecordingSink>;

fn join(room: &mut TestRoom, id: u64) -> Role {
    match room.handle(RoomEvent::Joined(id)) {
        RoomUpdate::Joined(role) => role,
        other => panic!("unexpected {:?}", other),
    }
}

/// Fire the live timer once
fn fire(room: &mut TestRoom) -> RoomUpdate {
    let (handle, _) = *room.timer().live.first().expect("no live timer");
    room.handle(RoomEvent::Tick(handle))
}

fn started_pair(room: &mut TestRoom) -> (u64, u64) {
    let first = join(room, 1);
    join(room, 2);
    let (mover, rotator) = if first == Role::Mover { (1, 2) } else { (2, 1) };
    room.handle(RoomEvent::Message(mover, Command::Ready(true)));
    assert_eq!(
        room.handle(RoomEvent::Message(rotator, Command::Ready(true))),
        RoomUpdate::Started
    );
    (mover, rotator)
}

#[test]
fn test_role_assignment_sequence() {
    for seed in 1..30 {
        let mut room = Room::new(seed, ManualTimer::default(), RecordingSink::default());
        let first = join(&mut room, 10);
        let second = join(&mut room, 11);
        assert_eq!(second, first.opposite());
        for id in 12..16 {
            assert_eq!(join(&mut room, id), Role::Rotator);
        }
        assert_eq!(room.roles().len(), 6);
    }
}

#[test]
fn test_cooperative_start() {
    let mut room = Room::new(8, ManualTimer::default(), RecordingSink::default());
    let (mover, rotator) = started_pair(&mut room);

    assert!(room.game().running());
    assert_eq!(room.timer().history, vec![Duration::from_millis(1000)]);
    assert!(room.sink().snapshots.last().unwrap().running);

    // Start happens once
    room.handle(RoomEvent::Message(rotator, Command::Ready(true)));
    room.handle(RoomEvent::Message(mover, Command::Ready(true)));
    assert_eq!(room.timer().history.len(), 1);
}

#[test]
fn test_third_player_must_be_ready_too() {
    let mut room = Room::new(8, ManualTimer::default(), RecordingSink::default());
    let first = join(&mut room, 1);
    join(&mut room, 2);
    join(&mut room, 3);
    let (mover, rotator) = if first == Role::Mover { (1, 2) } else { (2, 1) };

    room.handle(RoomEvent::Message(mover, Command::Ready(true)));
    room.handle(RoomEvent::Message(rotator, Command::Ready(true)));
    assert!(!room.game().running());

    assert_eq!(
        room.handle(RoomEvent::Message(3, Command::Ready(true))),
        RoomUpdate::Started
    );
}

#[test]
fn test_role_gated_commands() {
    let game = GameState::from_parts(
        Board::default(),
        Piece::new(ShapeKind::T),
        Position::new(3, 4),
        Piece::new(ShapeKind::O),
        1,
    );
    let mut room = Room::with_parts(
        game,
        RoleManager::new(6),
        ManualTimer::default(),
        RecordingSink::default(),
    );
    let (mover, rotator) = started_pair(&mut room);
    let published = room.sink().snapshots.len();

    // Wrong roles: silently ignored
    assert_eq!(
        room.handle(RoomEvent::Message(rotator, Command::Move(LEFT))),
        RoomUpdate::Rejected
    );
    assert_eq!(
        room.handle(RoomEvent::Message(mover, Command::Rotate)),
        RoomUpdate::Rejected
    );
    assert_eq!(room.game().position(), Position::new(3, 4));
    assert_eq!(room.game().current().orientation(), 0);
    assert_eq!(room.sink().snapshots.len(), published);

    // Right roles: applied and broadcast
    assert_eq!(
        room.handle(RoomEvent::Message(mover, Command::Move(RIGHT))),
        RoomUpdate::Applied
    );
    assert_eq!(
        room.handle(RoomEvent::Message(rotator, Command::Rotate)),
        RoomUpdate::Applied
    );
    let last = room.sink().snapshots.last().unwrap();
    assert_eq!(last.position, Position::new(3, 5));
    assert_eq!(last.current.orientation, 1);
    assert_eq!(room.sink().snapshots.len(), published + 2);
}

#[test]
fn test_blocked_move_publishes_nothing() {
    let game = GameState::from_parts(
        Board::default(),
        Piece::new(ShapeKind::O),
        Position::new(3, 0),
        Piece::new(ShapeKind::O),
        1,
    );
    let mut room = Room::with_parts(
        game,
        RoleManager::new(6),
        ManualTimer::default(),
        RecordingSink::default(),
    );
    let (mover, _) = started_pair(&mut room);
    let published = room.sink().snapshots.len();

    assert_eq!(
        room.handle(RoomEvent::Message(mover, Command::Move(LEFT))),
        RoomUpdate::Rejected
    );
    assert_eq!(room.sink().snapshots.len(), published);
}

#[test]
fn test_extreme_move_delta_is_rejected_and_room_survives() {
    let mut room = Room::new(17, ManualTimer::default(), RecordingSink::default());
    let (mover, _) = started_pair(&mut room);
    let published = room.sink().snapshots.len();
    let before = room.snapshot();

    for delta in [
        Movement::new(i32::MIN, i32::MAX),
        Movement::new(i32::MAX, i32::MIN),
        Movement::new(0, i32::MAX),
        Movement::new(0, i32::MIN),
    ] {
        assert_eq!(
            room.handle(RoomEvent::Message(mover, Command::Move(delta))),
            RoomUpdate::Rejected,
            "{:?}",
            delta
        );
    }
    assert_eq!(room.snapshot(), before);
    assert_eq!(room.sink().snapshots.len(), published);

    // Still ticking and still accepting ordinary moves
    fire(&mut room);
    assert_eq!(
        room.handle(RoomEvent::Message(mover, Command::Move(LEFT))),
        RoomUpdate::Applied
    );
}

#[test]
fn test_snapshots_follow_event_order() {
    let mut room = Room::new(31, ManualTimer::default(), RecordingSink::default());
    let (mover, _) = started_pair(&mut room);

    let before = room.sink().snapshots.len();
    fire(&mut room);
    room.handle(RoomEvent::Message(mover, Command::Move(LEFT)));
    fire(&mut room);

    let tail = &room.sink().snapshots[before..];
    assert_eq!(tail.len(), 3);
    assert_eq!(tail[0].position.row, 1);
    assert_eq!(tail[1].position, Position::new(1, 4));
    assert_eq!(tail[2].position, Position::new(2, 4));
}

#[test]
fn test_level_up_restarts_timer_with_shorter_period() {
    let mut board = Board::default();
    for row in 16..20 {
        for col in 1..10 {
            board.set_cell(row, col, 3);
        }
    }
    let game = GameState::from_parts(
        board,
        Piece::new(ShapeKind::I).rotate_next(),
        Position::new(16, -2),
        Piece::new(ShapeKind::O),
        2,
    )
    .with_progress(8, 0);
    let mut room = Room::with_parts(
        game,
        RoleManager::new(2),
        ManualTimer::default(),
        RecordingSink::default(),
    );
    started_pair(&mut room);
    let old = room.active_timer().unwrap();

    let update = fire(&mut room);
    assert!(matches!(
        update,
        RoomUpdate::Ticked(TickOutcome::Advanced {
            lines_cleared: 4,
            level_up: Some(1),
            ..
        })
    ));
    assert_eq!(
        room.timer().history,
        vec![Duration::from_millis(1000), Duration::from_millis(500)]
    );
    assert_eq!(room.timer().live.len(), 1);
    assert_eq!(room.timer().cancels, 1);
    assert_eq!(room.handle(RoomEvent::Tick(old)), RoomUpdate::StaleTick);

    // Ordinary ticks never touch the timer
    for _ in 0..5 {
        fire(&mut room);
    }
    assert_eq!(room.timer().history.len(), 2);
}

#[test]
fn test_unattended_room_reaches_game_over() {
    let mut room = Room::new(99, ManualTimer::default(), RecordingSink::default());
    let (mover, _) = started_pair(&mut room);

    let mut ticks = 0;
    while room.game().running() {
        ticks += 1;
        assert!(ticks < 10_000, "game never ended");
        fire(&mut room);
    }

    assert!(room.game().game_over());
    assert!(room.timer().live.is_empty());
    assert!(room.active_timer().is_none());
    let last = room.sink().snapshots.last().unwrap().clone();
    assert!(!last.running);
    assert!(last.game_over);

    // Nothing restarts a finished game
    room.handle(RoomEvent::Message(mover, Command::Ready(false)));
    room.handle(RoomEvent::Message(mover, Command::Ready(true)));
    room.handle(RoomEvent::Message(mover, Command::Move(LEFT)));
    assert!(!room.game().running());
    assert_eq!(room.snapshot(), last);
    assert_eq!(room.timer().history.len(), 1);
}

#[test]
fn test_leaving_players_keep_roles_and_loop() {
    let mut room = Room::new(12, ManualTimer::default(), RecordingSink::default());
    let (mover, rotator) = started_pair(&mut room);
    join(&mut room, 3);

    room.handle(RoomEvent::Left(mover));
    assert!(room.game().running());
    assert_eq!(room.roles().role_of(rotator), Some(Role::Rotator));
    assert_eq!(room.roles().role_of(3), Some(Role::Rotator));

    // The loop keeps dropping pieces
    let row = room.game().position().row;
    fire(&mut room);
    assert_ne!(room.game().position().row, row);

    // A newcomer takes the free Mover seat
    assert_eq!(join(&mut room, 4), Role::Mover);
}
