//! Benchmarks for the four record-writing strategies.
//!
//! Benchmark targets:
//! - Write throughput per strategy at increasing record counts
//! - The relative cost ordering (index cheapest, graph most expensive)
//!
//! These run against the in-memory store, so the numbers measure the
//! strategy logic and adapter overhead rather than disk I/O.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_possible_wrap)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use graphseries::models::WriteStrategy;
use graphseries::services::{RecordWriter, SchemaService};
use graphseries::storage::{InMemoryStore, StoreBackend};

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let schema = SchemaService::new(Arc::clone(&store) as Arc<dyn StoreBackend>);
    schema.define().unwrap();
    schema
        .create_sensor("1", &graphseries::models::Properties::new())
        .unwrap();
    store
}

/// Benchmarks a single write per strategy against an empty store.
fn bench_single_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_write");
    group.measurement_time(Duration::from_secs(3));

    for strategy in WriteStrategy::all() {
        group.bench_function(strategy.as_str(), |b| {
            let mut timestamp = 0_i64;
            let store = seeded_store();
            let writer = RecordWriter::new(Arc::clone(&store) as Arc<dyn StoreBackend>);
            b.iter(|| {
                timestamp += 1;
                writer
                    .write(black_box("1"), black_box(timestamp), black_box(0), strategy)
                    .unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmarks full write loops at increasing record counts.
fn bench_write_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_loop");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for count in [100_usize, 1_000] {
        for strategy in WriteStrategy::all() {
            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), count),
                &count,
                |b, &count| {
                    b.iter(|| {
                        let store = seeded_store();
                        let writer =
                            RecordWriter::new(Arc::clone(&store) as Arc<dyn StoreBackend>);
                        for ordinal in 0..count {
                            writer.write("1", ordinal as i64, 0, strategy).unwrap();
                        }
                        black_box(store)
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_single_write, bench_write_loop);
criterion_main!(benches);
