//! Benchmark run results.

use crate::models::WriteStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock timing for one sensor's write loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorTiming {
    /// Sensor id the timing belongs to.
    pub sensor_id: String,
    /// Number of records written.
    pub records: usize,
    /// Number of records skipped after per-write failures.
    pub skipped: usize,
    /// Total wall-clock time for the loop.
    pub elapsed: Duration,
}

impl SensorTiming {
    /// Writes per second over the loop, or 0.0 for an empty loop.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.records as f64 / secs } else { 0.0 }
    }
}

/// Result of a full benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Strategy the run exercised.
    pub strategy: WriteStrategy,
    /// Per-sensor timings, in seeding order.
    pub timings: Vec<SensorTiming>,
    /// Sensor that received the sentinel value.
    pub sentinel_sensor: String,
    /// Write ordinal at which the sentinel value was planted.
    pub sentinel_position: usize,
    /// Number of AFFECTS edges created.
    pub edges_created: usize,
}

impl BenchmarkReport {
    /// Total records written across all sensors.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.timings.iter().map(|t| t.records).sum()
    }

    /// Total records skipped across all sensors.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.timings.iter().map(|t| t.skipped).sum()
    }

    /// Total wall-clock time spent in write loops.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }
}
