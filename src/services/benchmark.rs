//! The timed benchmark run.

use crate::config::BenchConfig;
use crate::models::schema::names;
use crate::models::{BenchmarkReport, SensorTiming};
use crate::services::{RandomEdgeGenerator, RecordWriter, SchemaService};
use crate::storage::StoreBackend;
use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Value planted at one random (sensor, ordinal) position so a follow-up
/// query can prove the written data is retrievable, not just counted.
pub const SENTINEL_VALUE: i64 = 123;

/// All other observations carry this value.
const BASELINE_VALUE: i64 = 0;

/// Drives one full benchmark run: schema definition, reset, sensor
/// seeding, the timed per-sensor write loops, and the random AFFECTS
/// graph.
///
/// Each record's timestamp is its write ordinal in epoch milliseconds,
/// so a sensor's records are unique per (sensorid, timestamp) and all
/// land on the same handful of calendar days.
pub struct BenchmarkRunner {
    store: Arc<dyn StoreBackend>,
    config: BenchConfig,
}

impl BenchmarkRunner {
    /// Creates a runner over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn StoreBackend>, config: BenchConfig) -> Self {
        Self { store, config }
    }

    /// Executes the run and returns its report.
    ///
    /// With `continue_on_error` set, a failed write is logged and counted
    /// as skipped; otherwise the first failure aborts the run. Everything
    /// before the failing write stays committed either way, since each
    /// write is its own unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] for an unsatisfiable
    /// configuration, or the first storage error when not continuing on
    /// errors.
    pub fn run(&self) -> Result<BenchmarkReport> {
        self.config.validate()?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let schema = SchemaService::new(Arc::clone(&self.store));
        schema.define()?;
        let removed = schema.reset()?;
        info!(removed, strategy = %self.config.strategy, "starting benchmark run");

        let sentinel_sensor = rng.random_range(1..=self.config.num_sensors).to_string();
        let sentinel_position = rng.random_range(0..self.config.records_per_sensor);

        let mut extra = self.config.extra_properties.clone();
        extra.insert(
            "method".to_string(),
            serde_json::json!(self.config.strategy.as_str()),
        );
        for id in 1..=self.config.num_sensors {
            schema.create_sensor(&id.to_string(), &extra)?;
        }

        let writer = RecordWriter::new(Arc::clone(&self.store));
        let mut timings = Vec::with_capacity(usize::try_from(self.config.num_sensors).unwrap_or(0));
        for id in 1..=self.config.num_sensors {
            let sensor_id = id.to_string();
            timings.push(self.write_loop(
                &writer,
                &sensor_id,
                &sentinel_sensor,
                sentinel_position,
            )?);
        }

        let mut generator = RandomEdgeGenerator::new(Arc::clone(&self.store), rng.random());
        let edges_created = generator.generate(
            names::SENSOR,
            names::AFFECTS,
            1,
            self.config.num_sensors,
            self.config.out_degree,
        )?;

        let report = BenchmarkReport {
            strategy: self.config.strategy,
            timings,
            sentinel_sensor,
            sentinel_position,
            edges_created,
        };
        info!(
            records = report.total_records(),
            skipped = report.total_skipped(),
            elapsed_ms = report.total_elapsed().as_millis(),
            edges = report.edges_created,
            "benchmark run finished"
        );
        Ok(report)
    }

    /// Runs and times one sensor's write loop.
    fn write_loop(
        &self,
        writer: &RecordWriter,
        sensor_id: &str,
        sentinel_sensor: &str,
        sentinel_position: usize,
    ) -> Result<SensorTiming> {
        let mut records = 0_usize;
        let mut skipped = 0_usize;
        let start = Instant::now();
        for ordinal in 0..self.config.records_per_sensor {
            let value = if sensor_id == sentinel_sensor && ordinal == sentinel_position {
                SENTINEL_VALUE
            } else {
                BASELINE_VALUE
            };
            #[allow(clippy::cast_possible_wrap)]
            let timestamp = ordinal as i64;
            match writer.write(sensor_id, timestamp, value, self.config.strategy) {
                Ok(()) => records += 1,
                Err(error) if self.config.continue_on_error => {
                    warn!(sensor_id, ordinal, %error, "write failed, skipping record");
                    skipped += 1;
                }
                Err(error) => return Err(error),
            }
        }
        let elapsed = start.elapsed();
        info!(
            sensor_id,
            records,
            skipped,
            elapsed_ms = elapsed.as_millis(),
            "sensor write loop done"
        );
        Ok(SensorTiming {
            sensor_id: sensor_id.to_string(),
            records,
            skipped,
            elapsed,
        })
    }
}
