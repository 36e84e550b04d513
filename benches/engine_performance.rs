//! Performance benchmarks for the rating engine and evaluator

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use partnership_elo::evaluation::{evaluate, spearman, Signal};
use partnership_elo::rating::{EloRatingCalculator, EloSettings, PairwiseRater};
use partnership_elo::types::{MatchRecord, Outcome, Partnership};
use partnership_elo::{RatingEngine, RatingStore};
use std::collections::BTreeSet;

const PLAYERS: u64 = 200;

/// Deterministic club schedule: rotating partnerships and scores
fn schedule(matches: u64) -> Vec<MatchRecord> {
    (0..matches)
        .map(|i| {
            let seat = |offset: u64| (i * 7 + offset * 53) % PLAYERS;
            let ns_score = ((i * 31) % 13) as f64;
            MatchRecord::new(
                i,
                Partnership(seat(0), seat(1)),
                Partnership(seat(2), seat(3)),
                ns_score,
                12.0 - ns_score,
            )
        })
        .collect()
}

fn seeded_store() -> RatingStore {
    let ids: BTreeSet<u64> = (0..PLAYERS).collect();
    let mut store = RatingStore::new();
    store.initialize(&ids, 1200.0).unwrap();
    store
}

fn bench_pairwise_update(c: &mut Criterion) {
    let rater = EloRatingCalculator::new(EloSettings::default()).unwrap();

    c.bench_function("pairwise_update", |b| {
        b.iter(|| black_box(rater.rate(black_box(2430.0), black_box(2380.0), Outcome::NsWins)))
    });
}

fn bench_engine_run(c: &mut Criterion) {
    let engine = RatingEngine::from_config(&Default::default()).unwrap();
    let mut group = c.benchmark_group("engine_run");

    for size in [1_000u64, 10_000] {
        let matches = schedule(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &matches, |b, matches| {
            b.iter(|| {
                let mut store = seeded_store();
                black_box(engine.run(matches, &mut store).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let engine = RatingEngine::from_config(&Default::default()).unwrap();
    let matches = schedule(5_000);
    let mut store = seeded_store();
    engine.run(&matches, &mut store).unwrap();

    let ratings = Signal::from_snapshot("elo", &store.snapshot());
    let masterpoints = Signal::new("masterpoints", (0..PLAYERS).map(|id| (id, id as f64)).collect());

    c.bench_function("evaluate_5000_matches", |b| {
        b.iter(|| black_box(evaluate(&matches, &ratings, &masterpoints).unwrap()))
    });

    let xs: Vec<f64> = (0..5_000).map(|i| ((i * 37) % 101) as f64).collect();
    let ys: Vec<f64> = (0..5_000).map(|i| ((i * 11) % 97) as f64).collect();
    c.bench_function("spearman_5000", |b| {
        b.iter(|| black_box(spearman(&xs, &ys)))
    });
}

criterion_group!(
    benches,
    bench_pairwise_update,
    bench_engine_run,
    bench_evaluation
);
criterion_main!(benches);
