//! Property-based tests for the benchmark invariants.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Date decomposition is total over representable instants and stable
//! - Same-day timestamps resolve to the same Day vertex
//! - The (sensorid, timestamp) unique index rejects duplicates for any pair
//! - Random graphs honor out-degree, no-self-loop, and distinct-target
//!   guarantees for any valid (population, out-degree) combination

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use graphseries::models::schema::names;
use graphseries::models::{Properties, WriteStrategy};
use graphseries::services::{DateHierarchy, RandomEdgeGenerator, RecordWriter, SchemaService};
use graphseries::storage::{InMemoryStore, StoreBackend};
use graphseries::Error;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

const DAY_MS: i64 = 86_400_000;

fn benchmark_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    SchemaService::new(Arc::clone(&store) as Arc<dyn StoreBackend>)
        .define()
        .unwrap();
    store
}

fn seed_sensors(store: &InMemoryStore, count: u64) {
    let mut tx = store.begin().unwrap();
    for id in 1..=count {
        let mut properties = Properties::new();
        properties.insert(names::ID.to_string(), json!(id.to_string()));
        properties.insert(names::TIMESERIES.to_string(), json!({}));
        tx.create_vertex(names::SENSOR, properties).unwrap();
    }
    tx.commit().unwrap();
}

proptest! {
    /// Property: decomposition succeeds for any instant within a wide
    /// window around the epoch and produces a valid calendar date.
    #[test]
    fn prop_decompose_is_total_and_valid(timestamp in -20_000 * DAY_MS..20_000 * DAY_MS) {
        let (year, month, day) = DateHierarchy::decompose(timestamp).unwrap();
        prop_assert!((1915..=2025).contains(&year));
        prop_assert!((1..=12).contains(&month));
        prop_assert!((1..=31).contains(&day));
    }

    /// Property: two timestamps on the same UTC day decompose equally,
    /// and adding a whole day moves the date.
    #[test]
    fn prop_same_day_decomposes_equally(day_index in 0_i64..10_000, offset in 0..DAY_MS) {
        let midnight = day_index * DAY_MS;
        prop_assert_eq!(
            DateHierarchy::decompose(midnight).unwrap(),
            DateHierarchy::decompose(midnight + offset).unwrap()
        );
        prop_assert_ne!(
            DateHierarchy::decompose(midnight).unwrap(),
            DateHierarchy::decompose(midnight + DAY_MS).unwrap()
        );
    }

    /// Property: within one unit of work, same-day timestamps resolve to
    /// one Day vertex and different days to different ones.
    #[test]
    fn prop_resolution_converges_per_day(day_index in 0_i64..5_000, offset in 0..DAY_MS) {
        let store = benchmark_store();
        seed_sensors(&store, 1);
        let sensor = store
            .lookup_by_key(names::SENSOR, names::ID, &json!("1"))
            .unwrap()
            .unwrap();

        let mut tx = store.begin().unwrap();
        let midnight = day_index * DAY_MS;
        let a = DateHierarchy::resolve(tx.as_mut(), sensor, midnight).unwrap();
        let b = DateHierarchy::resolve(tx.as_mut(), sensor, midnight + offset).unwrap();
        let c = DateHierarchy::resolve(tx.as_mut(), sensor, midnight + DAY_MS).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_ne!(a, c);
    }

    /// Property: a second record with the same (sensorid, timestamp)
    /// conflicts and leaves exactly one record, for any timestamp.
    #[test]
    fn prop_duplicate_observation_always_conflicts(timestamp in 0_i64..1_000_000) {
        let store = benchmark_store();
        seed_sensors(&store, 1);
        let writer = RecordWriter::new(Arc::clone(&store) as Arc<dyn StoreBackend>);

        writer.write("1", timestamp, 0, WriteStrategy::Index).unwrap();
        let err = writer.write("1", timestamp, 1, WriteStrategy::Index).unwrap_err();
        prop_assert!(matches!(err, Error::Conflict(_)));
        prop_assert_eq!(store.count_type(names::RECORD).unwrap(), 1);
    }

    /// Property: for any valid population and out-degree, every vertex
    /// ends up with exactly `out_degree` distinct non-self targets.
    #[test]
    fn prop_random_graph_honors_out_degree(
        population in 2_u64..12,
        out_degree_offset in 0_usize..10,
        seed in any::<u64>(),
    ) {
        let out_degree = 1 + out_degree_offset % (usize::try_from(population).unwrap() - 1);
        let store = benchmark_store();
        seed_sensors(&store, population);
        let mut generator =
            RandomEdgeGenerator::new(Arc::clone(&store) as Arc<dyn StoreBackend>, seed);
        let created = generator
            .generate(names::SENSOR, names::AFFECTS, 1, population, out_degree)
            .unwrap();
        prop_assert_eq!(created, usize::try_from(population).unwrap() * out_degree);

        for id in 1..=population {
            let source = store
                .lookup_by_key(names::SENSOR, names::ID, &json!(id.to_string()))
                .unwrap()
                .unwrap();
            let targets = store.out_neighbors(source, names::AFFECTS).unwrap();
            prop_assert_eq!(targets.len(), out_degree);
            let distinct: HashSet<_> = targets.iter().copied().collect();
            prop_assert_eq!(distinct.len(), out_degree);
            prop_assert!(!targets.contains(&source));
        }
    }

    /// Property: the embed strategy keeps one map entry per distinct
    /// timestamp, with last-write-wins per key, regardless of order.
    #[test]
    fn prop_embed_map_has_one_entry_per_timestamp(
        mut timestamps in prop::collection::vec(0_i64..1_000, 1..30),
    ) {
        let store = benchmark_store();
        seed_sensors(&store, 1);
        let writer = RecordWriter::new(Arc::clone(&store) as Arc<dyn StoreBackend>);
        for &ts in &timestamps {
            writer.write("1", ts, ts, WriteStrategy::Embed).unwrap();
        }

        timestamps.sort_unstable();
        timestamps.dedup();
        let sensor = store
            .lookup_by_key(names::SENSOR, names::ID, &json!("1"))
            .unwrap()
            .unwrap();
        let node = store.get_node(sensor).unwrap();
        let map = node.properties[names::TIMESERIES].as_object().unwrap();
        prop_assert_eq!(map.len(), timestamps.len());
        for ts in &timestamps {
            prop_assert_eq!(map[&ts.to_string()][names::VALUE].as_i64(), Some(*ts));
        }
    }
}
