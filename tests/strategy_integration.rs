//! End-to-end runs for each persistence strategy.
//!
//! Every strategy stores the same logical observations in a different
//! physical shape. These tests run the full benchmark per strategy and
//! check that the (sensorid, timestamp, value) triples are recoverable
//! from each encoding, including the planted sentinel value.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use graphseries::config::BenchConfig;
use graphseries::models::schema::names;
use graphseries::models::{BenchmarkReport, NodeId, WriteStrategy};
use graphseries::services::{BenchmarkRunner, SENTINEL_VALUE};
use graphseries::storage::{InMemoryStore, StoreBackend};
use std::collections::BTreeSet;
use std::sync::Arc;

const SENSORS: u64 = 4;
const RECORDS: usize = 25;

fn run(strategy: WriteStrategy) -> (Arc<InMemoryStore>, BenchmarkReport) {
    let store = Arc::new(InMemoryStore::new());
    let config = BenchConfig {
        num_sensors: SENSORS,
        records_per_sensor: RECORDS,
        out_degree: 2,
        strategy,
        seed: Some(99),
        ..BenchConfig::default()
    };
    let report = BenchmarkRunner::new(Arc::clone(&store) as Arc<dyn StoreBackend>, config)
        .run()
        .unwrap();
    (store, report)
}

/// Recovers all (sensorid, timestamp, value) triples from whatever shape
/// the strategy stored them in.
fn extract_triples(store: &InMemoryStore, strategy: WriteStrategy) -> BTreeSet<(String, i64, i64)> {
    match strategy {
        // Both write standalone Record documents carrying all three fields.
        WriteStrategy::Index | WriteStrategy::Reference => store
            .scan_type(names::RECORD)
            .unwrap()
            .into_iter()
            .map(|record| {
                (
                    record.get_str(names::SENSOR_ID).unwrap().to_string(),
                    record.get_i64(names::TIMESTAMP).unwrap(),
                    record.get_i64(names::VALUE).unwrap(),
                )
            })
            .collect(),
        WriteStrategy::Graph => {
            let mut triples = BTreeSet::new();
            for sensor in store.scan_type(names::SENSOR).unwrap() {
                let sensor_id = sensor.get_str(names::ID).unwrap().to_string();
                for day in descend(store, sensor.id) {
                    let day_node = store.get_node(day).unwrap();
                    let embedded = day_node.properties[names::TIMESERIES].as_array().unwrap();
                    for record in embedded {
                        triples.insert((
                            sensor_id.clone(),
                            record[names::TIMESTAMP].as_i64().unwrap(),
                            record[names::VALUE].as_i64().unwrap(),
                        ));
                    }
                }
            }
            triples
        },
        WriteStrategy::Embed => {
            let mut triples = BTreeSet::new();
            for sensor in store.scan_type(names::SENSOR).unwrap() {
                let sensor_id = sensor.get_str(names::ID).unwrap().to_string();
                let map = sensor.properties[names::TIMESERIES].as_object().unwrap();
                for (timestamp, entry) in map {
                    triples.insert((
                        sensor_id.clone(),
                        timestamp.parse::<i64>().unwrap(),
                        entry[names::VALUE].as_i64().unwrap(),
                    ));
                }
            }
            triples
        },
    }
}

/// All Day vertices reachable from a sensor through the date hierarchy.
fn descend(store: &InMemoryStore, sensor: NodeId) -> Vec<NodeId> {
    let mut days = Vec::new();
    for year in store.out_neighbors(sensor, names::HAS_YEAR).unwrap() {
        for month in store.out_neighbors(year, names::HAS_MONTH).unwrap() {
            days.extend(store.out_neighbors(month, names::HAS_DAY).unwrap());
        }
    }
    days
}

fn expected_triples(report: &BenchmarkReport) -> BTreeSet<(String, i64, i64)> {
    let mut triples = BTreeSet::new();
    for sensor in 1..=SENSORS {
        let sensor_id = sensor.to_string();
        for ordinal in 0..RECORDS {
            let value = if sensor_id == report.sentinel_sensor && ordinal == report.sentinel_position
            {
                SENTINEL_VALUE
            } else {
                0
            };
            #[allow(clippy::cast_possible_wrap)]
            triples.insert((sensor_id.clone(), ordinal as i64, value));
        }
    }
    triples
}

#[test]
fn test_every_strategy_stores_the_same_observations() {
    let reference_triples = {
        let (store, report) = run(WriteStrategy::Index);
        let triples = extract_triples(&store, WriteStrategy::Index);
        assert_eq!(triples, expected_triples(&report));
        triples
    };

    for strategy in [WriteStrategy::Graph, WriteStrategy::Reference, WriteStrategy::Embed] {
        let (store, report) = run(strategy);
        let triples = extract_triples(&store, strategy);
        assert_eq!(triples, expected_triples(&report), "strategy {strategy}");
        assert_eq!(triples, reference_triples, "strategy {strategy}");
    }
}

#[test]
fn test_sentinel_is_retrievable_by_index_lookup() {
    let (store, report) = run(WriteStrategy::Index);

    // Point query through the (sensorid, timestamp) unique index path:
    // the single record carrying the sentinel value.
    let sentinel_records: Vec<_> = store
        .scan_type(names::RECORD)
        .unwrap()
        .into_iter()
        .filter(|r| r.get_i64(names::VALUE) == Some(SENTINEL_VALUE))
        .collect();
    assert_eq!(sentinel_records.len(), 1);
    assert_eq!(
        sentinel_records[0].get_str(names::SENSOR_ID),
        Some(report.sentinel_sensor.as_str())
    );
}

#[test]
fn test_graph_strategy_shares_hierarchy_within_a_sensor() {
    let (store, _) = run(WriteStrategy::Graph);

    // Ordinal timestamps stay within 1970-01-01, so each sensor grows
    // exactly one Year, Month, and Day. Nothing is shared across sensors.
    let sensors = usize::try_from(SENSORS).unwrap();
    assert_eq!(store.count_type(names::YEAR).unwrap(), sensors);
    assert_eq!(store.count_type(names::MONTH).unwrap(), sensors);
    assert_eq!(store.count_type(names::DAY).unwrap(), sensors);
    assert_eq!(store.count_type(names::HAS_YEAR).unwrap(), sensors);
}

#[test]
fn test_affects_graph_has_exact_out_degree() {
    let (store, report) = run(WriteStrategy::Embed);
    assert_eq!(report.edges_created, usize::try_from(SENSORS).unwrap() * 2);

    for sensor in store.scan_type(names::SENSOR).unwrap() {
        let targets = store.out_neighbors(sensor.id, names::AFFECTS).unwrap();
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains(&sensor.id));
    }
}

#[test]
fn test_rerun_with_other_strategy_starts_clean() {
    let store = Arc::new(InMemoryStore::new());
    let mut config = BenchConfig {
        num_sensors: SENSORS,
        records_per_sensor: RECORDS,
        out_degree: 2,
        strategy: WriteStrategy::Index,
        seed: Some(99),
        ..BenchConfig::default()
    };

    BenchmarkRunner::new(Arc::clone(&store) as Arc<dyn StoreBackend>, config.clone())
        .run()
        .unwrap();
    config.strategy = WriteStrategy::Embed;
    BenchmarkRunner::new(Arc::clone(&store) as Arc<dyn StoreBackend>, config)
        .run()
        .unwrap();

    // No standalone records survive from the index run.
    assert_eq!(store.count_type(names::RECORD).unwrap(), 0);
    let triples = extract_triples(&store, WriteStrategy::Embed);
    assert_eq!(triples.len(), usize::try_from(SENSORS).unwrap() * RECORDS);
}
