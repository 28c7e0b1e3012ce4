//! Rules, rollout and search throughput.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - Incremental index update against a full rebuild
//! - Weighted rollouts from the opening and a midgame position
//! - Full MCTS search with fixed iteration counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tablut_mcts::games::tablut::{GameState, MoveIndex, TablutGame};
use tablut_mcts::mcts::{MCTSConfig, MCTSSearch};
use tablut_mcts::{Game, GameRng};

/// Play `plies` policy moves from the opening with a fixed seed.
fn midgame(plies: usize) -> GameState {
    let game = TablutGame::default();
    let mut rng = GameRng::new(11);
    let mut state = GameState::new();
    for _ in 0..plies {
        if state.is_terminal() {
            break;
        }
        match game.policy().sample(&state, &mut rng) {
            Some(action) => state.apply_action(&action),
            None => break,
        }
    }
    state
}

// =============================================================================
// Rules Engine Benchmarks
// =============================================================================

fn bench_apply_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_action");
    let state = midgame(12);
    let actions = state.legal_actions();

    group.throughput(Throughput::Elements(actions.len() as u64));
    group.bench_function("incremental", |b| {
        b.iter(|| {
            for action in &actions {
                let mut next = state.clone();
                next.apply_action(action);
                black_box(next);
            }
        });
    });
    group.bench_function("full_rebuild", |b| {
        b.iter(|| {
            for _ in &actions {
                black_box(MoveIndex::build(state.grid()));
            }
        });
    });

    group.finish();
}

fn bench_legal_actions(c: &mut Criterion) {
    let state = midgame(12);
    c.bench_function("legal_actions_midgame", |b| {
        b.iter(|| black_box(state.legal_actions()));
    });
}

// =============================================================================
// Rollout Benchmarks
// =============================================================================

fn bench_rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout");
    let game = TablutGame::default();

    for (name, plies) in [("opening", 0usize), ("midgame", 12)] {
        let state = midgame(plies);
        group.bench_with_input(BenchmarkId::new("weighted", name), &state, |b, state| {
            let mut rng = GameRng::new(42);
            b.iter(|| black_box(game.rollout(state, &mut rng)));
        });
    }

    group.finish();
}

// =============================================================================
// Search Benchmarks
// =============================================================================

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    group.sample_size(10);
    let state = midgame(6);

    for iterations in [50u32, 200] {
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("midgame", iterations),
            &iterations,
            |b, &iterations| {
                let config = MCTSConfig::default().with_max_iterations(iterations);
                b.iter(|| {
                    let mut search = MCTSSearch::new(TablutGame::default(), config.clone());
                    black_box(search.search(&state))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_action,
    bench_legal_actions,
    bench_rollout,
    bench_search
);
criterion_main!(benches);
