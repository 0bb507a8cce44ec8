//! Graph elements: vertices, documents, and edges.
//!
//! Elements are plain data snapshots. The storage layer hands out owned
//! copies; mutation goes through a transaction as
//! read-current-state → produce-new-state → commit, never through a
//! long-lived mutable handle.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Property bag for vertices, documents, and embedded records.
pub type Properties = HashMap<String, Value>;

/// Unique identifier for a vertex or standalone document.
///
/// Ids are allocated by the storage backend and are stable for the lifetime
/// of the store. Embedded documents do not receive ids: they live inside a
/// parent attribute and are not independently addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a node id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Renders this id as a reference value suitable for storing in a
    /// property, e.g. the `reference` strategy's `timeseries` attribute.
    #[must_use]
    pub fn to_ref_value(self) -> Value {
        serde_json::json!({ "@ref": self.0 })
    }

    /// Parses a reference value produced by [`Self::to_ref_value`].
    #[must_use]
    pub fn from_ref_value(value: &Value) -> Option<Self> {
        value.get("@ref").and_then(Value::as_u64).map(Self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates an edge id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e#{}", self.0)
    }
}

/// Whether an element is a vertex or a standalone document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A vertex that can participate in edges.
    Vertex,
    /// A standalone document; cannot be an edge endpoint.
    Document,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// A snapshot of a vertex or standalone document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Backend-assigned identity.
    pub id: NodeId,
    /// Schema type name, e.g. `"Sensor"` or `"Record"`.
    pub type_name: String,
    /// Vertex or document.
    pub kind: ElementKind,
    /// Property values, including any undeclared extra properties.
    pub properties: Properties,
}

impl Node {
    /// Returns an integer property, if present and integral.
    #[must_use]
    pub fn get_i64(&self, property: &str) -> Option<i64> {
        self.properties.get(property).and_then(Value::as_i64)
    }

    /// Returns a string property, if present.
    #[must_use]
    pub fn get_str(&self, property: &str) -> Option<&str> {
        self.properties.get(property).and_then(Value::as_str)
    }
}

/// A directed edge between two vertices.
///
/// The `bidirectional` flag records whether the backend should also index
/// the reverse direction. Hierarchy and `AFFECTS` edges always set it to
/// `false`: directionality matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Backend-assigned identity.
    pub id: EdgeId,
    /// Edge type name, e.g. `"HAS_YEAR"`.
    pub type_name: String,
    /// Source vertex.
    pub from: NodeId,
    /// Target vertex.
    pub to: NodeId,
    /// Whether the reverse direction is also traversable.
    pub bidirectional: bool,
}
