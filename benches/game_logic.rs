use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetrolyseus::core::mutations::{clear_lines, detect_completed_lines};
use tetrolyseus::core::validation::{collides_with_board, keep_inside_bounds};
use tetrolyseus::core::{Board, GameState, Piece};
use tetrolyseus::types::{Position, ShapeKind, RIGHT};

fn bench_tick(c: &mut Criterion) {
    c.bench_function("game_tick", |b| {
        let mut state = GameState::with_defaults(12345);
        state.start();
        b.iter(|| {
            if !state.running() {
                state = GameState::with_defaults(12345);
                state.start();
            }
            black_box(state.tick());
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::default();
            // Fill bottom 4 rows
            for row in 16..20 {
                for col in 0..10 {
                    board.set_cell(row, col, 0x00f0f0);
                }
            }
            let completed = detect_completed_lines(&board);
            clear_lines(&mut board, &completed);
            black_box(board);
        })
    });
}

fn bench_collision(c: &mut Criterion) {
    let mut board = Board::default();
    for col in 0..9 {
        board.set_cell(19, col, 1);
    }
    let piece = Piece::new(ShapeKind::T);

    c.bench_function("collides_with_board", |b| {
        b.iter(|| collides_with_board(&board, black_box(&piece), black_box(Position::new(17, 4))))
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut state = GameState::with_defaults(12345);
    state.start();

    c.bench_function("try_move", |b| {
        b.iter(|| {
            black_box(state.try_move(RIGHT));
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut state = GameState::with_defaults(12345);
    state.start();

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            black_box(state.try_rotate());
        })
    });
}

fn bench_keep_inside_bounds(c: &mut Criterion) {
    let board = Board::default();
    let piece = Piece::new(ShapeKind::I);

    c.bench_function("keep_inside_bounds", |b| {
        b.iter(|| keep_inside_bounds(&board, black_box(&piece), black_box(Position::new(18, 9))))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_collision,
    bench_try_move,
    bench_try_rotate,
    bench_keep_inside_bounds
);
criterion_main!(benches);
