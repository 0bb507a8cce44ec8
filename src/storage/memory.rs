//! In-memory store backend.
//!
//! Reference implementation of [`StoreBackend`] used by the benchmark and
//! the test suite. State lives behind an `RwLock`; transactions stage their
//! writes in a private overlay and apply them under the write lock at
//! commit, so a unit of work either lands completely or not at all.

use crate::models::{
    Edge, EdgeId, ElementKind, Node, NodeId, Properties, PropertyType, SchemaType, TypeKind,
};
use crate::storage::traits::{StoreBackend, StoreTransaction};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory graph/document store.
///
/// # Example
///
/// ```rust,ignore
/// use graphseries::storage::{InMemoryStore, StoreBackend};
/// use graphseries::models::TypeKind;
///
/// let store = InMemoryStore::new();
/// store.get_or_create_type("Sensor", TypeKind::Vertex)?;
/// let mut tx = store.begin()?;
/// // stage operations, then:
/// tx.commit()?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    // Shared allocator so ids staged by an uncommitted transaction can
    // never collide with committed ones.
    next_id: AtomicU64,
}

#[derive(Debug, Default)]
struct StoreState {
    schema: HashMap<String, SchemaType>,
    nodes: BTreeMap<u64, Node>,
    edges: BTreeMap<u64, Edge>,
    /// Outgoing edge ids per source vertex.
    out_edges: HashMap<u64, Vec<u64>>,
    /// Unique index name → (encoded key values → node id).
    unique: HashMap<String, HashMap<String, u64>>,
}

/// Canonical name for a unique index.
fn index_name(type_name: &str, properties: &[String]) -> String {
    format!("{type_name}[{}]", properties.join(","))
}

/// Encodes the indexed property values of a node, or `None` when a key
/// property is absent.
fn index_key(properties: &[String], node_properties: &Properties) -> Option<String> {
    let mut parts = Vec::with_capacity(properties.len());
    for property in properties {
        parts.push(node_properties.get(property)?.to_string());
    }
    Some(parts.join("\u{1f}"))
}

impl StoreState {
    fn schema_of(&self, type_name: &str) -> Result<&SchemaType> {
        self.schema
            .get(type_name)
            .ok_or_else(|| Error::NotFound(format!("schema type '{type_name}'")))
    }

    /// Validates declared properties of `type_name` against `properties`.
    /// Undeclared properties pass through untyped.
    fn validate_properties(&self, type_name: &str, properties: &Properties) -> Result<()> {
        let schema_type = self.schema_of(type_name)?;
        for (property, declared) in &schema_type.properties {
            if let Some(value) = properties.get(property) {
                if !declared.accepts(value) {
                    return Err(Error::Validation {
                        property: format!("{type_name}.{property}"),
                        cause: format!("expected {declared}, got {value}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks a node's property values against all unique indexes of its
    /// type, ignoring the node's own prior entry.
    fn check_unique(&self, node: &Node, exclude: Option<u64>) -> Result<()> {
        let Some(schema_type) = self.schema.get(&node.type_name) else {
            return Ok(());
        };
        for index_properties in &schema_type.unique_indexes {
            let name = index_name(&node.type_name, index_properties);
            let Some(key) = index_key(index_properties, &node.properties) else {
                continue;
            };
            if let Some(&holder) = self.unique.get(&name).and_then(|m| m.get(&key)) {
                if Some(holder) != exclude {
                    return Err(Error::Conflict(format!(
                        "duplicate key {key:?} for unique index {name}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Removes a node's entries from the unique index maps.
    fn unindex(&mut self, node: &Node) {
        let Some(schema_type) = self.schema.get(&node.type_name) else {
            return;
        };
        let mut stale = Vec::new();
        for index_properties in &schema_type.unique_indexes {
            let name = index_name(&node.type_name, index_properties);
            if let Some(key) = index_key(index_properties, &node.properties) {
                stale.push((name, key));
            }
        }
        for (name, key) in stale {
            if let Some(map) = self.unique.get_mut(&name) {
                map.remove(&key);
            }
        }
    }

    /// Adds a node's entries to the unique index maps.
    fn index(&mut self, node: &Node) {
        let Some(schema_type) = self.schema.get(&node.type_name) else {
            return;
        };
        let mut fresh = Vec::new();
        for index_properties in &schema_type.unique_indexes {
            let name = index_name(&node.type_name, index_properties);
            if let Some(key) = index_key(index_properties, &node.properties) {
                fresh.push((name, key));
            }
        }
        for (name, key) in fresh {
            self.unique.entry(name).or_default().insert(key, node.id.as_u64());
        }
    }
}

impl InMemoryStore {
    /// Creates an empty store with no schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self, operation: &str) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| Error::backend(operation, "lock poisoned"))
    }

    fn write_state(&self, operation: &str) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| Error::backend(operation, "lock poisoned"))
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl StoreBackend for InMemoryStore {
    fn get_or_create_type(&self, name: &str, kind: TypeKind) -> Result<()> {
        let mut state = self.write_state("get_or_create_type")?;
        if let Some(existing) = state.schema.get(name) {
            if existing.kind == kind {
                return Ok(());
            }
            return Err(Error::Conflict(format!(
                "type '{name}' already defined as {}",
                existing.kind
            )));
        }
        state.schema.insert(name.to_string(), SchemaType::new(name, kind));
        Ok(())
    }

    fn get_or_create_property(
        &self,
        type_name: &str,
        property: &str,
        property_type: PropertyType,
    ) -> Result<()> {
        let mut state = self.write_state("get_or_create_property")?;
        state.schema_of(type_name)?;
        let schema_type = state
            .schema
            .get_mut(type_name)
            .ok_or_else(|| Error::NotFound(format!("schema type '{type_name}'")))?;
        if let Some(existing) = schema_type.properties.get(property) {
            if *existing == property_type {
                return Ok(());
            }
            return Err(Error::Conflict(format!(
                "property '{type_name}.{property}' already declared as {existing}"
            )));
        }
        schema_type.properties.insert(property.to_string(), property_type);
        Ok(())
    }

    fn get_or_create_unique_index(&self, type_name: &str, properties: &[&str]) -> Result<()> {
        let mut state = self.write_state("get_or_create_unique_index")?;
        state.schema_of(type_name)?;
        let key_properties: Vec<String> = properties.iter().map(ToString::to_string).collect();
        {
            let schema_type = state
                .schema
                .get_mut(type_name)
                .ok_or_else(|| Error::NotFound(format!("schema type '{type_name}'")))?;
            if schema_type.unique_indexes.contains(&key_properties) {
                return Ok(());
            }
            schema_type.unique_indexes.push(key_properties.clone());
        }

        // Backfill from existing data, failing on a pre-existing duplicate.
        let name = index_name(type_name, &key_properties);
        let mut entries: HashMap<String, u64> = HashMap::new();
        for node in state.nodes.values().filter(|n| n.type_name == type_name) {
            if let Some(key) = index_key(&key_properties, &node.properties) {
                if entries.insert(key.clone(), node.id.as_u64()).is_some() {
                    return Err(Error::Conflict(format!(
                        "existing data violates unique index {name}: duplicate key {key:?}"
                    )));
                }
            }
        }
        state.unique.insert(name, entries);
        Ok(())
    }

    fn schema_type(&self, name: &str) -> Result<Option<SchemaType>> {
        let state = self.read_state("schema_type")?;
        Ok(state.schema.get(name).cloned())
    }

    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            staged_nodes: BTreeMap::new(),
            created_nodes: HashSet::new(),
            staged_edges: Vec::new(),
        }))
    }

    fn lookup_by_key(
        &self,
        type_name: &str,
        property: &str,
        value: &Value,
    ) -> Result<Option<NodeId>> {
        let state = self.read_state("lookup_by_key")?;
        state.schema_of(type_name)?;

        // Serve from the unique index when one covers exactly this property.
        let name = index_name(type_name, std::slice::from_ref(&property.to_string()));
        if let Some(entries) = state.unique.get(&name) {
            return Ok(entries.get(&value.to_string()).map(|&id| NodeId::new(id)));
        }

        Ok(state
            .nodes
            .values()
            .find(|n| n.type_name == type_name && n.properties.get(property) == Some(value))
            .map(|n| n.id))
    }

    fn get_node(&self, id: NodeId) -> Result<Node> {
        let state = self.read_state("get_node")?;
        state
            .nodes
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("node {id}")))
    }

    fn scan_type(&self, type_name: &str) -> Result<Vec<Node>> {
        let state = self.read_state("scan_type")?;
        state.schema_of(type_name)?;
        Ok(state
            .nodes
            .values()
            .filter(|n| n.type_name == type_name)
            .cloned()
            .collect())
    }

    fn out_neighbors(&self, from: NodeId, edge_type: &str) -> Result<Vec<NodeId>> {
        let state = self.read_state("out_neighbors")?;
        let Some(edge_ids) = state.out_edges.get(&from.as_u64()) else {
            return Ok(Vec::new());
        };
        Ok(edge_ids
            .iter()
            .filter_map(|edge_id| state.edges.get(edge_id))
            .filter(|edge| edge.type_name == edge_type)
            .map(|edge| edge.to)
            .collect())
    }

    fn count_type(&self, type_name: &str) -> Result<usize> {
        let state = self.read_state("count_type")?;
        let schema_type = state.schema_of(type_name)?;
        if schema_type.kind == TypeKind::Edge {
            Ok(state.edges.values().filter(|e| e.type_name == type_name).count())
        } else {
            Ok(state.nodes.values().filter(|n| n.type_name == type_name).count())
        }
    }

    fn truncate_type(&self, type_name: &str) -> Result<usize> {
        let mut state = self.write_state("truncate_type")?;
        let kind = state.schema_of(type_name)?.kind;

        if kind == TypeKind::Edge {
            let doomed: Vec<u64> = state
                .edges
                .values()
                .filter(|e| e.type_name == type_name)
                .map(|e| e.id.as_u64())
                .collect();
            for edge_id in &doomed {
                state.edges.remove(edge_id);
            }
            for edge_ids in state.out_edges.values_mut() {
                edge_ids.retain(|edge_id| !doomed.contains(edge_id));
            }
            return Ok(doomed.len());
        }

        let doomed: Vec<Node> = state
            .nodes
            .values()
            .filter(|n| n.type_name == type_name)
            .cloned()
            .collect();
        let doomed_ids: HashSet<u64> = doomed.iter().map(|n| n.id.as_u64()).collect();
        for node in &doomed {
            state.nodes.remove(&node.id.as_u64());
            state.unindex(node);
        }
        // Removing vertices also removes their incident edges.
        if kind == TypeKind::Vertex {
            let dangling: Vec<u64> = state
                .edges
                .values()
                .filter(|e| {
                    doomed_ids.contains(&e.from.as_u64()) || doomed_ids.contains(&e.to.as_u64())
                })
                .map(|e| e.id.as_u64())
                .collect();
            for edge_id in &dangling {
                state.edges.remove(edge_id);
            }
            for id in &doomed_ids {
                state.out_edges.remove(id);
            }
            for edge_ids in state.out_edges.values_mut() {
                edge_ids.retain(|edge_id| !dangling.contains(edge_id));
            }
        }
        Ok(doomed.len())
    }
}

/// Staged unit of work against an [`InMemoryStore`].
///
/// Reads see committed state overlaid with this transaction's writes.
/// Dropping without committing discards everything.
pub struct MemoryTransaction<'a> {
    store: &'a InMemoryStore,
    /// Created and modified node snapshots, keyed by id.
    staged_nodes: BTreeMap<u64, Node>,
    /// Subset of `staged_nodes` created inside this transaction.
    created_nodes: HashSet<u64>,
    staged_edges: Vec<Edge>,
}

impl MemoryTransaction<'_> {
    /// Ensures `id` has a staged snapshot, cloning committed state on first
    /// touch, and returns it for mutation.
    fn snapshot_for_update(&mut self, id: NodeId, operation: &str) -> Result<&mut Node> {
        if !self.staged_nodes.contains_key(&id.as_u64()) {
            let node = self.store.get_node(id)?;
            self.staged_nodes.insert(id.as_u64(), node);
        }
        self.staged_nodes
            .get_mut(&id.as_u64())
            .ok_or_else(|| Error::backend(operation, "staged snapshot vanished"))
    }

    /// Eager uniqueness check against committed state and staged siblings.
    /// Commit re-checks, but failing at the staging call gives the caller
    /// an actionable error position.
    fn check_unique_staged(&self, candidate: &Node) -> Result<()> {
        let state = self.store.read_state("check_unique")?;
        state.check_unique(candidate, Some(candidate.id.as_u64()))?;

        let Some(schema_type) = state.schema.get(&candidate.type_name) else {
            return Ok(());
        };
        for index_properties in &schema_type.unique_indexes {
            let Some(key) = index_key(index_properties, &candidate.properties) else {
                continue;
            };
            for sibling in self.staged_nodes.values() {
                if sibling.id != candidate.id
                    && sibling.type_name == candidate.type_name
                    && index_key(index_properties, &sibling.properties) == Some(key.clone())
                {
                    return Err(Error::Conflict(format!(
                        "duplicate key {key:?} staged twice for {}",
                        index_name(&candidate.type_name, index_properties)
                    )));
                }
            }
        }
        Ok(())
    }

    fn stage_element(
        &mut self,
        type_name: &str,
        expected_kind: TypeKind,
        element_kind: ElementKind,
        properties: Properties,
    ) -> Result<NodeId> {
        {
            let state = self.store.read_state("create_element")?;
            let schema_type = state.schema_of(type_name)?;
            if schema_type.kind != expected_kind {
                return Err(Error::InvalidArgument(format!(
                    "type '{type_name}' is a {} type, not a {expected_kind} type",
                    schema_type.kind
                )));
            }
            state.validate_properties(type_name, &properties)?;
        }

        let id = NodeId::new(self.store.allocate_id());
        let node = Node {
            id,
            type_name: type_name.to_string(),
            kind: element_kind,
            properties,
        };
        self.check_unique_staged(&node)?;
        self.staged_nodes.insert(id.as_u64(), node);
        self.created_nodes.insert(id.as_u64());
        Ok(id)
    }

    fn node_kind(&self, id: NodeId) -> Result<ElementKind> {
        if let Some(node) = self.staged_nodes.get(&id.as_u64()) {
            return Ok(node.kind);
        }
        Ok(self.store.get_node(id)?.kind)
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn lookup_by_key(
        &self,
        type_name: &str,
        property: &str,
        value: &Value,
    ) -> Result<Option<NodeId>> {
        for node in self.staged_nodes.values() {
            if node.type_name == type_name && node.properties.get(property) == Some(value) {
                return Ok(Some(node.id));
            }
        }
        if let Some(id) = self.store.lookup_by_key(type_name, property, value)? {
            // A staged modification may have moved the key away from this node.
            if self.staged_nodes.contains_key(&id.as_u64()) {
                return Ok(None);
            }
            return Ok(Some(id));
        }
        Ok(None)
    }

    fn read_node(&self, id: NodeId) -> Result<Node> {
        if let Some(node) = self.staged_nodes.get(&id.as_u64()) {
            return Ok(node.clone());
        }
        self.store.get_node(id)
    }

    fn out_neighbors(&self, from: NodeId, edge_type: &str) -> Result<Vec<NodeId>> {
        let mut neighbors = if self.created_nodes.contains(&from.as_u64()) {
            Vec::new()
        } else {
            self.store.out_neighbors(from, edge_type)?
        };
        neighbors.extend(
            self.staged_edges
                .iter()
                .filter(|edge| edge.from == from && edge.type_name == edge_type)
                .map(|edge| edge.to),
        );
        Ok(neighbors)
    }

    fn create_vertex(&mut self, type_name: &str, properties: Properties) -> Result<NodeId> {
        self.stage_element(type_name, TypeKind::Vertex, ElementKind::Vertex, properties)
    }

    fn create_document(&mut self, type_name: &str, properties: Properties) -> Result<NodeId> {
        self.stage_element(type_name, TypeKind::Document, ElementKind::Document, properties)
    }

    fn create_embedded_document(
        &mut self,
        parent: NodeId,
        attribute: &str,
        type_name: &str,
        properties: Properties,
    ) -> Result<()> {
        {
            let state = self.store.read_state("create_embedded_document")?;
            let schema_type = state.schema_of(type_name)?;
            if schema_type.kind != TypeKind::Document {
                return Err(Error::InvalidArgument(format!(
                    "embedded documents must use a document type, '{type_name}' is a {}",
                    schema_type.kind
                )));
            }
            state.validate_properties(type_name, &properties)?;
        }

        let mut embedded = serde_json::Map::new();
        embedded.insert("@type".to_string(), Value::String(type_name.to_string()));
        for (property, value) in properties {
            embedded.insert(property, value);
        }

        let attribute_name = attribute.to_string();
        let parent_node = self.snapshot_for_update(parent, "create_embedded_document")?;
        let slot = parent_node
            .properties
            .entry(attribute_name.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => {
                items.push(Value::Object(embedded));
                Ok(())
            }
            other => Err(Error::Validation {
                property: attribute_name,
                cause: format!("expected List for embedded documents, got {other}"),
            }),
        }
    }

    fn update_node(&mut self, id: NodeId, properties: Properties) -> Result<()> {
        let type_name = self.read_node(id)?.type_name;
        {
            let state = self.store.read_state("update_node")?;
            state.validate_properties(&type_name, &properties)?;
        }
        let node = self.snapshot_for_update(id, "update_node")?;
        node.properties.extend(properties);
        let updated = node.clone();
        self.check_unique_staged(&updated)
    }

    fn set_map_entry(
        &mut self,
        id: NodeId,
        attribute: &str,
        key: &str,
        value: Value,
    ) -> Result<()> {
        // The in-memory overlay already holds the whole node, so the keyed
        // update mutates the staged map directly. A remote backend maps
        // this call to a keyed patch, not a full attribute rewrite.
        let attribute_name = attribute.to_string();
        let node = self.snapshot_for_update(id, "set_map_entry")?;
        let slot = node
            .properties
            .entry(attribute_name.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        match slot {
            Value::Object(entries) => {
                entries.insert(key.to_string(), value);
                Ok(())
            }
            other => Err(Error::Validation {
                property: attribute_name,
                cause: format!("expected Map for keyed update, got {other}"),
            }),
        }
    }

    fn create_edge(
        &mut self,
        type_name: &str,
        from: NodeId,
        to: NodeId,
        bidirectional: bool,
    ) -> Result<EdgeId> {
        {
            let state = self.store.read_state("create_edge")?;
            let schema_type = state.schema_of(type_name)?;
            if schema_type.kind != TypeKind::Edge {
                return Err(Error::InvalidArgument(format!(
                    "type '{type_name}' is a {} type, not an edge type",
                    schema_type.kind
                )));
            }
        }
        for endpoint in [from, to] {
            if self.node_kind(endpoint)? != ElementKind::Vertex {
                return Err(Error::InvalidArgument(format!(
                    "edge endpoint {endpoint} is not a vertex"
                )));
            }
        }

        let id = EdgeId::new(self.store.allocate_id());
        self.staged_edges.push(Edge {
            id,
            type_name: type_name.to_string(),
            from,
            to,
            bidirectional,
        });
        Ok(id)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let Self {
            store,
            staged_nodes,
            created_nodes,
            staged_edges,
        } = *self;

        let mut state = store.write_state("commit")?;

        // Phase 1: validate everything against current committed state.
        for (raw_id, node) in &staged_nodes {
            if !created_nodes.contains(raw_id) && !state.nodes.contains_key(raw_id) {
                return Err(Error::NotFound(format!(
                    "node {} disappeared before commit",
                    node.id
                )));
            }
            state.check_unique(node, Some(*raw_id))?;
        }
        let mut staged_keys: HashSet<(String, String)> = HashSet::new();
        for node in staged_nodes.values() {
            let Some(schema_type) = state.schema.get(&node.type_name) else {
                continue;
            };
            for index_properties in &schema_type.unique_indexes {
                if let Some(key) = index_key(index_properties, &node.properties) {
                    let name = index_name(&node.type_name, index_properties);
                    if !staged_keys.insert((name.clone(), key.clone())) {
                        return Err(Error::Conflict(format!(
                            "duplicate key {key:?} staged twice for {name}"
                        )));
                    }
                }
            }
        }
        for edge in &staged_edges {
            for endpoint in [edge.from, edge.to] {
                let raw = endpoint.as_u64();
                if !staged_nodes.contains_key(&raw) && !state.nodes.contains_key(&raw) {
                    return Err(Error::NotFound(format!(
                        "edge endpoint {endpoint} disappeared before commit"
                    )));
                }
            }
        }

        // Phase 2: apply. No fallible operation below this line.
        for (raw_id, node) in staged_nodes {
            if let Some(previous) = state.nodes.remove(&raw_id) {
                state.unindex(&previous);
            }
            state.index(&node);
            state.nodes.insert(raw_id, node);
        }
        for edge in staged_edges {
            state
                .out_edges
                .entry(edge.from.as_u64())
                .or_default()
                .push(edge.id.as_u64());
            state.edges.insert(edge.id.as_u64(), edge);
        }
        Ok(())
    }
}
