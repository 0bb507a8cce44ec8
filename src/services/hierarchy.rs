//! Date hierarchy resolution.
//!
//! The `graph` strategy files each record under a Year→Month→Day path
//! rooted at its sensor. The hierarchy is materialized lazily: every step
//! scans the parent's outgoing edges for a child carrying the wanted date
//! component and creates the child only when missing, so repeated writes
//! for the same calendar date converge on the same Day vertex.
//!
//! Children are looked up by equality scan, not sorted search; per-insert
//! cost is bounded by fan-out (≤ 12 months, ≤ 31 days per parent), which
//! is the right trade for small fan-out hierarchies only.
//!
//! Timestamps are decomposed with the proleptic Gregorian calendar in
//! **UTC**, so hierarchy placement is reproducible across environments
//! regardless of the host timezone.

use crate::models::NodeId;
use crate::models::schema::names;
use crate::storage::StoreTransaction;
use crate::{Error, Result};
use chrono::{DateTime, Datelike, Utc};
use serde_json::json;
use tracing::debug;

/// Resolves (sensor, timestamp) pairs to Day vertices, creating the
/// missing suffix of the Year→Month→Day path.
pub struct DateHierarchy;

impl DateHierarchy {
    /// Decomposes epoch milliseconds into (year, month, day) in UTC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the timestamp is outside the
    /// representable date range.
    pub fn decompose(timestamp_ms: i64) -> Result<(i32, u32, u32)> {
        let datetime: DateTime<Utc> =
            DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| Error::Validation {
                property: names::TIMESTAMP.to_string(),
                cause: format!("{timestamp_ms} is not a representable instant"),
            })?;
        Ok((datetime.year(), datetime.month(), datetime.day()))
    }

    /// Ensures the Year→Month→Day path for `timestamp_ms` exists below
    /// `sensor` and returns the Day vertex.
    ///
    /// Runs inside the caller's unit of work: either the whole missing
    /// suffix commits with the caller's write, or none of it does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unrepresentable timestamp, or
    /// any storage error from the transaction.
    pub fn resolve(
        tx: &mut dyn StoreTransaction,
        sensor: NodeId,
        timestamp_ms: i64,
    ) -> Result<NodeId> {
        let (year, month, day) = Self::decompose(timestamp_ms)?;
        debug!(%sensor, year, month, day, "resolving date hierarchy");

        let year_vertex =
            Self::get_or_create_child(tx, sensor, names::YEAR, names::HAS_YEAR, i64::from(year))?;
        let month_vertex = Self::get_or_create_child(
            tx,
            year_vertex,
            names::MONTH,
            names::HAS_MONTH,
            i64::from(month),
        )?;
        Self::get_or_create_child(tx, month_vertex, names::DAY, names::HAS_DAY, i64::from(day))
    }

    /// Returns the child of `parent` (via `edge_type`) whose `date`
    /// property equals `date_value`, creating vertex and edge when absent.
    ///
    /// A `Conflict` surfaced by the backend during creation means a
    /// concurrent writer materialized the same child first; it is retried
    /// as a plain lookup.
    fn get_or_create_child(
        tx: &mut dyn StoreTransaction,
        parent: NodeId,
        child_type: &str,
        edge_type: &str,
        date_value: i64,
    ) -> Result<NodeId> {
        if let Some(existing) = Self::find_child(tx, parent, edge_type, date_value)? {
            return Ok(existing);
        }

        let mut properties = crate::models::Properties::new();
        properties.insert(names::DATE.to_string(), json!(date_value));
        match tx.create_vertex(child_type, properties) {
            Ok(child) => {
                // Coarser to finer, never bidirectional.
                tx.create_edge(edge_type, parent, child, false)?;
                Ok(child)
            }
            Err(Error::Conflict(cause)) => {
                debug!(child_type, date_value, cause, "lost creation race, re-scanning");
                Self::find_child(tx, parent, edge_type, date_value)?.ok_or(Error::Conflict(cause))
            }
            Err(other) => Err(other),
        }
    }

    /// Equality scan over `parent`'s outgoing `edge_type` edges.
    fn find_child(
        tx: &dyn StoreTransaction,
        parent: NodeId,
        edge_type: &str,
        date_value: i64,
    ) -> Result<Option<NodeId>> {
        for candidate in tx.out_neighbors(parent, edge_type)? {
            let node = tx.read_node(candidate)?;
            if node.get_i64(names::DATE) == Some(date_value) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}
