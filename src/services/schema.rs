//! Schema management and sensor seeding.

use crate::models::schema::names;
use crate::models::{NodeId, Properties, PropertyType, TypeKind};
use crate::storage::StoreBackend;
use crate::{Error, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Defines the benchmark schema, seeds sensors, and resets data between
/// runs.
pub struct SchemaService {
    store: Arc<dyn StoreBackend>,
}

impl SchemaService {
    /// Creates a schema service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn StoreBackend>) -> Self {
        Self { store }
    }

    /// Defines all benchmark types, properties, and indexes.
    ///
    /// Every step is create-or-fetch, so calling this on an already
    /// defined store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is already taken with an incompatible
    /// definition.
    pub fn define(&self) -> Result<()> {
        self.store.get_or_create_type(names::SENSOR, TypeKind::Vertex)?;
        self.store
            .get_or_create_property(names::SENSOR, names::ID, PropertyType::String)?;
        self.store
            .get_or_create_property(names::SENSOR, names::TIMESERIES, PropertyType::Map)?;
        self.store.get_or_create_unique_index(names::SENSOR, &[names::ID])?;

        self.store.get_or_create_type(names::RECORD, TypeKind::Document)?;
        self.store
            .get_or_create_property(names::RECORD, names::SENSOR_ID, PropertyType::String)?;
        self.store
            .get_or_create_property(names::RECORD, names::TIMESTAMP, PropertyType::Long)?;
        self.store
            .get_or_create_property(names::RECORD, names::VALUE, PropertyType::Long)?;
        self.store
            .get_or_create_unique_index(names::RECORD, &[names::SENSOR_ID, names::TIMESTAMP])?;

        for hierarchy_type in [names::YEAR, names::MONTH, names::DAY] {
            self.store.get_or_create_type(hierarchy_type, TypeKind::Vertex)?;
            self.store
                .get_or_create_property(hierarchy_type, names::DATE, PropertyType::Long)?;
        }
        self.store
            .get_or_create_property(names::DAY, names::TIMESERIES, PropertyType::List)?;

        for edge_type in [names::HAS_YEAR, names::HAS_MONTH, names::HAS_DAY, names::AFFECTS] {
            self.store.get_or_create_type(edge_type, TypeKind::Edge)?;
        }

        info!("benchmark schema defined");
        Ok(())
    }

    /// Removes all benchmark data, returning the number of removed
    /// elements. The schema itself stays defined.
    ///
    /// # Errors
    ///
    /// Returns an error if a type is missing or a truncation fails.
    pub fn reset(&self) -> Result<usize> {
        let mut removed = 0;
        for type_name in names::ALL_TYPES {
            removed += self.store.truncate_type(type_name)?;
        }
        info!(removed, "store reset");
        Ok(removed)
    }

    /// Creates one sensor with an empty `timeseries` map and arbitrary
    /// extra properties, in its own unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if a sensor with this id already
    /// exists, or [`Error::InvalidArgument`] if the extra properties try
    /// to override the identity attributes.
    pub fn create_sensor(&self, id: &str, extra_properties: &Properties) -> Result<NodeId> {
        let mut properties = Properties::new();
        properties.insert(names::ID.to_string(), json!(id));
        properties.insert(names::TIMESERIES.to_string(), json!({}));
        for (property, value) in extra_properties {
            if property == names::ID || property == names::TIMESERIES {
                return Err(Error::InvalidArgument(format!(
                    "extra property '{property}' would override a sensor attribute"
                )));
            }
            properties.insert(property.clone(), value.clone());
        }

        let mut tx = self.store.begin()?;
        let sensor = tx.create_vertex(names::SENSOR, properties)?;
        tx.commit()?;
        Ok(sensor)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::storage::InMemoryStore;

    fn service() -> (Arc<InMemoryStore>, SchemaService) {
        let store = Arc::new(InMemoryStore::new());
        let service = SchemaService::new(Arc::clone(&store) as Arc<dyn StoreBackend>);
        (store, service)
    }

    #[test]
    fn test_define_is_idempotent() {
        let (store, service) = service();
        service.define().unwrap();
        service.define().unwrap();
        assert!(store.schema_type(names::SENSOR).unwrap().is_some());
        assert!(store.schema_type(names::AFFECTS).unwrap().is_some());
    }

    #[test]
    fn test_create_sensor_sets_identity_and_extra_properties() {
        let (store, service) = service();
        service.define().unwrap();

        let mut extra = Properties::new();
        extra.insert("location".to_string(), json!("indoor"));
        let sensor = service.create_sensor("1", &extra).unwrap();

        let node = store.get_node(sensor).unwrap();
        assert_eq!(node.get_str(names::ID), Some("1"));
        assert_eq!(node.get_str("location"), Some("indoor"));
        assert_eq!(node.properties[names::TIMESERIES], json!({}));
    }

    #[test]
    fn test_create_sensor_rejects_identity_override() {
        let (_, service) = service();
        service.define().unwrap();

        let mut extra = Properties::new();
        extra.insert(names::ID.to_string(), json!("other"));
        let err = service.create_sensor("1", &extra).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_duplicate_sensor_id_conflicts() {
        let (_, service) = service();
        service.define().unwrap();
        service.create_sensor("1", &Properties::new()).unwrap();
        let err = service.create_sensor("1", &Properties::new()).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_reset_clears_data_but_keeps_schema() {
        let (store, service) = service();
        service.define().unwrap();
        service.create_sensor("1", &Properties::new()).unwrap();

        let removed = service.reset().unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count_type(names::SENSOR).unwrap(), 0);
        assert!(store.schema_type(names::SENSOR).unwrap().is_some());

        // Seeding works again after a reset.
        service.create_sensor("1", &Properties::new()).unwrap();
    }
}
