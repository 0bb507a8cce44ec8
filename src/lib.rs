//! # Graphseries
//!
//! A benchmark harness for sensor time-series modeling strategies in a
//! graph/document store.
//!
//! Graphseries persists high-volume sensor observations under four mutually
//! exclusive storage encodings and measures the write cost of each:
//!
//! | Strategy | Shape | Write cost |
//! |----------|-------|------------|
//! | `index` | Standalone `Record` documents behind a (sensorid, timestamp) index | Cheapest |
//! | `graph` | Records embedded under a Year→Month→Day hierarchy per sensor | 3 upsert checks |
//! | `reference` | Sensor holds a reference to its most recent record | Overwrite |
//! | `embed` | Sensor holds a timestamp-keyed map updated one key at a time | Partial update |
//!
//! On top of the time-series writes, a random relationship graph (`AFFECTS`
//! edges with a fixed out-degree per sensor) is generated by sampling
//! without replacement.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use graphseries::models::WriteStrategy;
//! use graphseries::services::{RecordWriter, SchemaService};
//! use graphseries::storage::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! SchemaService::new(Arc::clone(&store) as _).define()?;
//! let writer = RecordWriter::new(store);
//! writer.write("3", 1000, 42, WriteStrategy::Graph)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::BenchConfig;
pub use models::{Node, NodeId, WriteStrategy};
pub use services::{
    BenchmarkRunner, DateHierarchy, RandomEdgeGenerator, RecordWriter, SchemaService,
};
pub use storage::{InMemoryStore, StoreBackend, StoreTransaction};

/// Error type for graphseries operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | A referenced sensor, vertex, or schema type does not exist |
/// | `Validation` | A property value violates its declared schema type |
/// | `InvalidArgument` | A precondition is violated (e.g. out-degree ≥ population) |
/// | `Conflict` | A unique index would be violated by a commit |
/// | `Backend` | An opaque storage-layer failure (lock poisoning, aborted commit) |
/// | `Config` | A configuration file cannot be read or parsed |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A referenced element does not exist.
    ///
    /// Raised when:
    /// - A sensor id does not resolve to an existing Sensor at write time
    /// - A transaction references a vertex that was never created
    /// - A schema type name is used before being defined
    #[error("not found: {0}")]
    NotFound(String),

    /// A property value violates its declared type.
    ///
    /// Raised when:
    /// - A declared `Long` property receives a non-integer value
    /// - A declared `Map` or `List` property receives a scalar
    /// - A timestamp cannot be decomposed into a calendar date
    #[error("validation failed for '{property}': {cause}")]
    Validation {
        /// The property that failed validation.
        property: String,
        /// Why the value was rejected.
        cause: String,
    },

    /// A precondition on an operation's arguments was violated.
    ///
    /// Raised when:
    /// - The requested out-degree is not smaller than the vertex population
    /// - An id range is empty or inverted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A uniqueness constraint was violated.
    ///
    /// Raised when a commit would insert a second element with the same
    /// unique key, e.g. two sensors with the same id. Under concurrent
    /// hierarchy creation the resolver catches this and retries as a
    /// plain lookup.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An opaque failure from the storage layer.
    ///
    /// Raised when:
    /// - A lock is poisoned
    /// - A transaction cannot be applied for reasons outside the caller's
    ///   control
    #[error("backend operation '{operation}' failed: {cause}")]
    Backend {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The configuration layer failed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Builds a `Backend` error from an operation name and cause.
    #[must_use]
    pub fn backend(operation: &str, cause: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.to_string(),
            cause: cause.into(),
        }
    }
}

/// Result type alias for graphseries operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("Sensor '42'".to_string());
        assert_eq!(err.to_string(), "not found: Sensor '42'");

        let err = Error::Validation {
            property: "timestamp".to_string(),
            cause: "expected Long".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation failed for 'timestamp': expected Long"
        );

        let err = Error::backend("commit", "lock poisoned");
        assert_eq!(
            err.to_string(),
            "backend operation 'commit' failed: lock poisoned"
        );
    }
}
