//! CLI command implementations.
//!
//! Each command resolves its inputs, drives the services, and returns a
//! serializable result; the binary decides how to print it.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Execute a timed benchmark run for one strategy |
//! | `reset` | Remove all benchmark data, keeping the schema |
//! | `stats` | Count stored elements per type |

use crate::config::BenchConfig;
use crate::models::BenchmarkReport;
use crate::models::schema::names;
use crate::services::{BenchmarkRunner, SchemaService};
use crate::storage::StoreBackend;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Element counts per schema type.
#[derive(Debug, Serialize)]
pub struct StoreStats {
    /// (type name, element count) pairs in schema order.
    pub counts: Vec<(String, usize)>,
}

impl StoreStats {
    /// Total elements across all types.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Runs one benchmark and returns its report.
///
/// # Errors
///
/// Returns an error if the configuration is unsatisfiable or the run
/// fails.
pub fn cmd_run(store: Arc<dyn StoreBackend>, config: BenchConfig) -> Result<BenchmarkReport> {
    BenchmarkRunner::new(store, config).run()
}

/// Removes all benchmark data and returns the number of removed
/// elements.
///
/// # Errors
///
/// Returns an error if the schema cannot be defined or a truncation
/// fails.
pub fn cmd_reset(store: Arc<dyn StoreBackend>) -> Result<usize> {
    let schema = SchemaService::new(store);
    schema.define()?;
    schema.reset()
}

/// Counts stored elements per benchmark type.
///
/// # Errors
///
/// Returns an error if the schema cannot be defined or a count fails.
pub fn cmd_stats(store: Arc<dyn StoreBackend>) -> Result<StoreStats> {
    SchemaService::new(Arc::clone(&store)).define()?;
    let mut counts = Vec::with_capacity(names::ALL_TYPES.len());
    for type_name in names::ALL_TYPES {
        counts.push(((*type_name).to_string(), store.count_type(type_name)?));
    }
    Ok(StoreStats { counts })
}
