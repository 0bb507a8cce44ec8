//! Strategy-polymorphic record writing.

use crate::models::schema::names;
use crate::models::{NodeId, Properties, WriteStrategy};
use crate::services::DateHierarchy;
use crate::storage::{StoreBackend, StoreTransaction};
use crate::{Error, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Persists time-series observations under one of the four strategies.
///
/// Every [`Self::write`] call is one atomic unit of work: the record (and,
/// for the `graph` strategy, any missing hierarchy suffix) either commits
/// completely or not at all. Failures propagate to the caller unmodified;
/// the writer never retries and never decides whether a run should abort.
pub struct RecordWriter {
    store: Arc<dyn StoreBackend>,
}

impl RecordWriter {
    /// Creates a writer over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn StoreBackend>) -> Self {
        Self { store }
    }

    /// Persists one observation for `sensor_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `sensor_id` does not resolve to an
    /// existing sensor, [`Error::Validation`] if a value violates its
    /// declared type, or any storage error from the unit of work.
    pub fn write(
        &self,
        sensor_id: &str,
        timestamp: i64,
        value: i64,
        strategy: WriteStrategy,
    ) -> Result<()> {
        debug!(sensor_id, timestamp, value, strategy = %strategy, "writing record");
        let mut tx = self.store.begin()?;
        let sensor = Self::require_sensor(tx.as_ref(), sensor_id)?;

        match strategy {
            WriteStrategy::Index => {
                Self::write_index(tx.as_mut(), sensor_id, timestamp, value)?;
            }
            WriteStrategy::Graph => {
                Self::write_graph(tx.as_mut(), sensor, timestamp, value)?;
            }
            WriteStrategy::Reference => {
                Self::write_reference(tx.as_mut(), sensor, sensor_id, timestamp, value)?;
            }
            WriteStrategy::Embed => {
                Self::write_embed(tx.as_mut(), sensor, timestamp, value)?;
            }
        }
        tx.commit()
    }

    fn require_sensor(tx: &dyn StoreTransaction, sensor_id: &str) -> Result<NodeId> {
        tx.lookup_by_key(names::SENSOR, names::ID, &json!(sensor_id))?
            .ok_or_else(|| Error::NotFound(format!("Sensor '{sensor_id}'")))
    }

    fn record_properties(sensor_id: &str, timestamp: i64, value: i64) -> Properties {
        let mut properties = Properties::new();
        properties.insert(names::SENSOR_ID.to_string(), json!(sensor_id));
        properties.insert(names::TIMESTAMP.to_string(), json!(timestamp));
        properties.insert(names::VALUE.to_string(), json!(value));
        properties
    }

    /// Standalone record; retrieval relies on the (sensorid, timestamp)
    /// secondary index. No hierarchy traversal, cheapest write.
    fn write_index(
        tx: &mut dyn StoreTransaction,
        sensor_id: &str,
        timestamp: i64,
        value: i64,
    ) -> Result<()> {
        tx.create_document(names::RECORD, Self::record_properties(sensor_id, timestamp, value))?;
        Ok(())
    }

    /// Record embedded under the sensor's Year→Month→Day hierarchy. Write
    /// cost grows with the three upsert checks; date-range reads get cheap.
    fn write_graph(
        tx: &mut dyn StoreTransaction,
        sensor: NodeId,
        timestamp: i64,
        value: i64,
    ) -> Result<()> {
        let day = DateHierarchy::resolve(tx, sensor, timestamp)?;
        let mut properties = Properties::new();
        properties.insert(names::TIMESTAMP.to_string(), json!(timestamp));
        properties.insert(names::VALUE.to_string(), json!(value));
        tx.create_embedded_document(day, names::TIMESERIES, names::RECORD, properties)
    }

    /// Standalone record plus an overwrite of the sensor's `timeseries`
    /// attribute with a reference to it. Retains only the most recent
    /// record reference; that is the contract, not a defect.
    fn write_reference(
        tx: &mut dyn StoreTransaction,
        sensor: NodeId,
        sensor_id: &str,
        timestamp: i64,
        value: i64,
    ) -> Result<()> {
        let record =
            tx.create_document(names::RECORD, Self::record_properties(sensor_id, timestamp, value))?;
        let mut update = Properties::new();
        update.insert(names::TIMESERIES.to_string(), record.to_ref_value());
        tx.update_node(sensor, update)
    }

    /// Keyed insert into the sensor's map-valued `timeseries` attribute,
    /// without reading the whole map first.
    fn write_embed(
        tx: &mut dyn StoreTransaction,
        sensor: NodeId,
        timestamp: i64,
        value: i64,
    ) -> Result<()> {
        let mut entry = serde_json::Map::new();
        entry.insert("@type".to_string(), json!(names::RECORD));
        entry.insert(names::VALUE.to_string(), json!(value));
        tx.set_map_entry(
            sensor,
            names::TIMESERIES,
            &timestamp.to_string(),
            serde_json::Value::Object(entry),
        )
    }
}
