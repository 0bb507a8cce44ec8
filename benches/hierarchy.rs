//! Benchmarks for date decomposition and hierarchy resolution.
//!
//! Benchmark targets:
//! - Timestamp decomposition: <1µs
//! - Warm hierarchy resolution (path already exists): dominated by the
//!   fan-out scans, not by vertex creation

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_possible_wrap)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use graphseries::models::Properties;
use graphseries::models::schema::names;
use graphseries::services::{DateHierarchy, SchemaService};
use graphseries::storage::{InMemoryStore, StoreBackend};

fn store_with_sensor() -> (Arc<InMemoryStore>, graphseries::models::NodeId) {
    let store = Arc::new(InMemoryStore::new());
    SchemaService::new(Arc::clone(&store) as Arc<dyn StoreBackend>)
        .define()
        .unwrap();
    let mut tx = store.begin().unwrap();
    let mut properties = Properties::new();
    properties.insert(names::ID.to_string(), serde_json::json!("1"));
    properties.insert(names::TIMESERIES.to_string(), serde_json::json!({}));
    let sensor = tx.create_vertex(names::SENSOR, properties).unwrap();
    tx.commit().unwrap();
    (store, sensor)
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("epoch_millis", |b| {
        b.iter(|| DateHierarchy::decompose(black_box(1_709_208_000_000)).unwrap());
    });
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.measurement_time(Duration::from_secs(3));

    // Path exists after the first call; every iteration re-finds it.
    group.bench_function("warm_path", |b| {
        let (store, sensor) = store_with_sensor();
        let mut tx = store.begin().unwrap();
        DateHierarchy::resolve(tx.as_mut(), sensor, 0).unwrap();
        tx.commit().unwrap();

        b.iter(|| {
            let mut tx = store.begin().unwrap();
            let day = DateHierarchy::resolve(tx.as_mut(), sensor, black_box(0)).unwrap();
            drop(tx);
            black_box(day)
        });
    });

    // A year's worth of distinct days under one sensor, built per iteration.
    group.bench_function("cold_year", |b| {
        const DAY_MS: i64 = 86_400_000;
        b.iter(|| {
            let (store, sensor) = store_with_sensor();
            let mut tx = store.begin().unwrap();
            for day in 0..365_i64 {
                DateHierarchy::resolve(tx.as_mut(), sensor, day * DAY_MS).unwrap();
            }
            tx.commit().unwrap();
            black_box(store)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_decompose, bench_resolve);
criterion_main!(benches);
