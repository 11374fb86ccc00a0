//! Rating engine performance benchmarks.
//!
//! Measures the per-keystroke operations against catalogs of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tierlist::persistence::{MemoryBlobStore, PersistedState};
use tierlist::{RatingEngine, Tier};

fn catalog(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| format!("/images/{}-photo_{:05}.jpg", 1_700_000_000_000u64 + i as u64, i))
        .collect()
}

/// Engine with half of the catalog rated, spread over all tiers.
fn half_rated(size: usize) -> RatingEngine {
    let mut engine = RatingEngine::with_catalog(catalog(size));
    for i in 0..size / 2 {
        let tier = Tier::new((i % 5) as u8 + 1).unwrap();
        engine.assign(tier).unwrap();
    }
    engine
}

fn bench_current_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("current_image");

    for size in [100, 1_000, 10_000] {
        let engine = half_rated(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("half_rated", size), &engine, |b, engine| {
            b.iter(|| black_box(engine.current_image()))
        });
    }

    group.finish();
}

fn bench_assign_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_undo");

    for size in [100, 1_000, 10_000] {
        let engine = half_rated(size);
        group.bench_with_input(BenchmarkId::new("half_rated", size), &engine, |b, engine| {
            let mut engine = engine.clone();
            let tier = Tier::new(3).unwrap();
            b.iter(|| {
                engine.assign(black_box(tier)).unwrap();
                engine.undo().unwrap();
            })
        });
    }

    group.finish();
}

fn bench_save_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_state");

    for size in [100, 1_000, 10_000] {
        let engine = half_rated(size);
        let blobs = MemoryBlobStore::new();
        group.bench_with_input(BenchmarkId::new("half_rated", size), &engine, |b, engine| {
            b.iter(|| {
                PersistedState::from_engine(black_box(engine))
                    .save(&blobs, "bench")
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_current_image, bench_assign_undo, bench_save_state);
criterion_main!(benches);
