use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use games_nineboard::{GameState, Opening, Side, SubBoard, LINES};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("nineboard_codec");
    let boards: Vec<SubBoard> = LINES
        .iter()
        .map(|&line| SubBoard::from_planes(line & 0b101_010_101, !line & 0b010_101_010))
        .collect();

    group.bench_function("is_won", |b| {
        b.iter(|| {
            boards
                .iter()
                .filter(|board| black_box(**board).is_won(Side::Circle))
                .count()
        });
    });

    group.bench_function("is_full", |b| {
        b.iter(|| {
            boards
                .iter()
                .filter(|board| black_box(**board).is_full())
                .count()
        });
    });

    group.finish();
}

fn bench_apply_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("nineboard_step");
    group.bench_function("apply_move", |b| {
        let base_state = GameState::initialize(4, 4, Opening::SecondMover).unwrap();
        b.iter_batched(
            || base_state,
            |mut state| {
                state.apply_move(0);
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_playout(c: &mut Criterion) {
    let mut group = c.benchmark_group("nineboard_playout");
    group.bench_function("opening_playout", |b| {
        let base_state = GameState::initialize(4, 4, Opening::SecondMover).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        b.iter_batched(
            || base_state,
            |mut state| state.random_playout(&mut rng),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_codec, bench_apply_move, bench_playout);
criterion_main!(benches);
