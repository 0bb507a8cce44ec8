//! Schema metadata and the benchmark's fixed type names.
//!
//! The store validates declared properties against these types on every
//! write; undeclared properties pass through untyped, matching the loose
//! document-store model the benchmark targets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Fixed schema names used by the benchmark.
pub mod names {
    /// Sensor vertex type.
    pub const SENSOR: &str = "Sensor";
    /// Standalone/embedded record document type.
    pub const RECORD: &str = "Record";
    /// Year hierarchy vertex type.
    pub const YEAR: &str = "Year";
    /// Month hierarchy vertex type.
    pub const MONTH: &str = "Month";
    /// Day hierarchy vertex type.
    pub const DAY: &str = "Day";

    /// Sensor → Year edge type.
    pub const HAS_YEAR: &str = "HAS_YEAR";
    /// Year → Month edge type.
    pub const HAS_MONTH: &str = "HAS_MONTH";
    /// Month → Day edge type.
    pub const HAS_DAY: &str = "HAS_DAY";
    /// Sensor → Sensor relationship edge type.
    pub const AFFECTS: &str = "AFFECTS";

    /// Sensor identity property.
    pub const ID: &str = "id";
    /// Calendar component property on hierarchy vertices.
    pub const DATE: &str = "date";
    /// Time-series attribute on Sensor (map/reference) and Day (list).
    pub const TIMESERIES: &str = "timeseries";
    /// Foreign sensor id on standalone records.
    pub const SENSOR_ID: &str = "sensorid";
    /// Milliseconds since epoch on records.
    pub const TIMESTAMP: &str = "timestamp";
    /// Observed value on records.
    pub const VALUE: &str = "value";

    /// All element types, in truncation order for a reset.
    pub const ALL_TYPES: [&str; 9] = [
        SENSOR, RECORD, YEAR, MONTH, DAY, HAS_YEAR, HAS_MONTH, HAS_DAY, AFFECTS,
    ];
}

/// Kind of a named schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Vertex type: participates in edges.
    Vertex,
    /// Document type: standalone or embedded records.
    Document,
    /// Edge type: connects two vertices.
    Edge,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Document => write!(f, "document"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Declared type of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Long,
    /// Key-value map.
    Map,
    /// Ordered list.
    List,
}

impl PropertyType {
    /// Checks whether a JSON value conforms to this declared type.
    #[must_use]
    pub fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Long => value.is_i64() || value.is_u64(),
            // A reference value is an object too; Map accepts both shapes
            // because the reference strategy overwrites a Map-declared
            // attribute with a record reference.
            Self::Map => value.is_object(),
            Self::List => value.is_array(),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Long => write!(f, "Long"),
            Self::Map => write!(f, "Map"),
            Self::List => write!(f, "List"),
        }
    }
}

/// A named schema type with declared properties and unique indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaType {
    /// Type name, unique within the store.
    pub name: String,
    /// Vertex, document, or edge.
    pub kind: TypeKind,
    /// Declared properties and their types.
    pub properties: HashMap<String, PropertyType>,
    /// Unique indexes, each a tuple of property names.
    pub unique_indexes: Vec<Vec<String>>,
}

impl SchemaType {
    /// Creates an empty schema type.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: HashMap::new(),
            unique_indexes: Vec::new(),
        }
    }
}
