use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::*;

fn open_empty_board(c: &mut Criterion) {
    let config = GameConfig::new(Coord::MAX, Coord::MAX, 0).unwrap();
    c.bench_function("cascade_255x255_empty", |b| {
        b.iter_batched(
            || GameState::with_seed(config, 0),
            |mut game| black_box(game.reveal((127, 127))),
            BatchSize::LargeInput,
        )
    });
}

fn open_sparse_board(c: &mut Criterion) {
    let config = GameConfig::new(100, 100, 500).unwrap();
    c.bench_function("first_reveal_100x100_500", |b| {
        let mut seed = 0;
        b.iter_batched(
            || {
                seed += 1;
                GameState::with_seed(config, seed)
            },
            |mut game| black_box(game.reveal((50, 50))),
            BatchSize::LargeInput,
        )
    });
}

fn undo_after_cascade(c: &mut Criterion) {
    let config = GameConfig::new(100, 100, 500).unwrap();
    c.bench_function("undo_100x100", |b| {
        b.iter_batched(
            || {
                let mut game = GameState::with_seed(config, 7);
                game.reveal((50, 50));
                game
            },
            |mut game| black_box(game.undo()),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, open_empty_board, open_sparse_board, undo_after_cascade);
criterion_main!(benches);
