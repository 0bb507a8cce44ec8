//! Backend and transaction traits for the storage adapter.
//!
//! This is the complete capability set the benchmark core requires from a
//! graph/document store:
//!
//! 1. Atomic unit-of-work execution ([`StoreBackend::begin`] +
//!    [`StoreTransaction::commit`])
//! 2. Create-or-fetch of named schema types, properties, and unique indexes
//! 3. Point lookup of a vertex by a unique secondary key
//! 4. Mutate-in-place of an existing vertex/document, expressed as
//!    read-current-state → produce-new-state → commit
//! 5. Creation of directed edges with an explicit `bidirectional` flag
//! 6. Creation of embedded child documents scoped to a parent attribute
//! 7. Partial keyed update of a map-valued attribute without a full
//!    read-modify-write cycle
//!
//! How a backend implements durability, indexing, or concurrency control is
//! outside this contract.
//!
//! # Implementor Notes
//!
//! - Backend methods use `&self` to enable sharing via
//!   `Arc<dyn StoreBackend>`; use interior mutability for mutable state.
//! - Reads on a transaction must observe the transaction's own staged
//!   writes (the hierarchy resolver creates a Year and immediately attaches
//!   a Month under it within one unit of work).
//! - A unique-index violation detected at commit must surface as
//!   [`crate::Error::Conflict`] with nothing applied.

use crate::Result;
use crate::models::{EdgeId, Node, NodeId, Properties, PropertyType, SchemaType, TypeKind};
use serde_json::Value;

/// A graph/document store the benchmark can run against.
pub trait StoreBackend: Send + Sync {
    // ========================================================================
    // Schema Operations (create-or-fetch, idempotent)
    // ========================================================================

    /// Creates a named schema type, or fetches it if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the name exists with a
    /// different kind.
    fn get_or_create_type(&self, name: &str, kind: TypeKind) -> Result<()>;

    /// Declares a typed property on an existing schema type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the type does not exist, or
    /// [`crate::Error::Conflict`] if the property is already declared with
    /// a different type.
    fn get_or_create_property(
        &self,
        type_name: &str,
        property: &str,
        property_type: PropertyType,
    ) -> Result<()>;

    /// Declares a unique index over one or more properties of a type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the type does not exist, or
    /// [`crate::Error::Conflict`] if existing data already violates the
    /// index.
    fn get_or_create_unique_index(&self, type_name: &str, properties: &[&str]) -> Result<()>;

    /// Returns the schema type with the given name, if defined.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be read.
    fn schema_type(&self, name: &str) -> Result<Option<SchemaType>>;

    // ========================================================================
    // Unit of Work
    // ========================================================================

    /// Starts a new unit of work.
    ///
    /// All operations staged on the returned transaction are applied
    /// atomically by [`StoreTransaction::commit`]; dropping the transaction
    /// without committing discards them.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction cannot be started.
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>>;

    // ========================================================================
    // Committed-State Reads and Maintenance
    // ========================================================================

    /// Point lookup of a committed vertex/document by property value.
    ///
    /// Backends should serve this from a secondary index when one covers
    /// the property.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn lookup_by_key(
        &self,
        type_name: &str,
        property: &str,
        value: &Value,
    ) -> Result<Option<NodeId>>;

    /// Returns a snapshot of a committed vertex/document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the id does not exist.
    fn get_node(&self, id: NodeId) -> Result<Node>;

    /// Returns snapshots of all committed elements of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails.
    fn scan_type(&self, type_name: &str) -> Result<Vec<Node>>;

    /// Returns the committed targets of `from`'s outgoing edges of the
    /// given type.
    ///
    /// # Errors
    ///
    /// Returns an error if the traversal fails.
    fn out_neighbors(&self, from: NodeId, edge_type: &str) -> Result<Vec<NodeId>>;

    /// Counts committed elements (nodes or edges) of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the count fails.
    fn count_type(&self, type_name: &str) -> Result<usize>;

    /// Removes all elements of a type, returning how many were removed.
    ///
    /// Removing a vertex type also removes edges incident to the removed
    /// vertices.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the type is not defined.
    fn truncate_type(&self, type_name: &str) -> Result<usize>;
}

/// An atomic unit of work against a [`StoreBackend`].
///
/// Reads observe committed state plus this transaction's staged writes.
/// Nothing is visible to other readers until [`Self::commit`] succeeds.
pub trait StoreTransaction {
    // ========================================================================
    // Reads (committed state + own staged writes)
    // ========================================================================

    /// Point lookup by property value.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn lookup_by_key(
        &self,
        type_name: &str,
        property: &str,
        value: &Value,
    ) -> Result<Option<NodeId>>;

    /// Returns a snapshot of a vertex/document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the id does not exist.
    fn read_node(&self, id: NodeId) -> Result<Node>;

    /// Returns the targets of `from`'s outgoing edges of the given type.
    ///
    /// # Errors
    ///
    /// Returns an error if the traversal fails.
    fn out_neighbors(&self, from: NodeId, edge_type: &str) -> Result<Vec<NodeId>>;

    // ========================================================================
    // Staged Writes
    // ========================================================================

    /// Stages creation of a vertex.
    ///
    /// Declared properties are validated against the schema immediately.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an undefined type,
    /// [`crate::Error::InvalidArgument`] for a non-vertex type,
    /// [`crate::Error::Validation`] for a declared-type violation, or
    /// [`crate::Error::Conflict`] for a unique-key collision.
    fn create_vertex(&mut self, type_name: &str, properties: Properties) -> Result<NodeId>;

    /// Stages creation of a standalone document.
    ///
    /// # Errors
    ///
    /// Same error modes as [`Self::create_vertex`], for document types.
    fn create_document(&mut self, type_name: &str, properties: Properties) -> Result<NodeId>;

    /// Stages creation of an embedded document inside a parent's
    /// list-valued attribute.
    ///
    /// The embedded document receives no id of its own; it is stored
    /// physically inside the parent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the parent does not exist, or
    /// the same schema errors as [`Self::create_document`].
    fn create_embedded_document(
        &mut self,
        parent: NodeId,
        attribute: &str,
        type_name: &str,
        properties: Properties,
    ) -> Result<()>;

    /// Stages a merge-update of an existing vertex/document.
    ///
    /// Supplied properties replace same-named properties; others are kept.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the id does not exist, or
    /// [`crate::Error::Validation`] for a declared-type violation.
    fn update_node(&mut self, id: NodeId, properties: Properties) -> Result<()>;

    /// Stages a keyed update of one entry in a map-valued attribute.
    ///
    /// The contract is a partial update: a backend with native keyed-patch
    /// support must not rewrite the whole map. A backend without that
    /// primitive may fall back to read-modify-write inside the unit of
    /// work, at a different performance point.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the id does not exist, or
    /// [`crate::Error::Validation`] if the attribute holds a non-map value.
    fn set_map_entry(
        &mut self,
        id: NodeId,
        attribute: &str,
        key: &str,
        value: Value,
    ) -> Result<()>;

    /// Stages creation of a directed edge.
    ///
    /// `bidirectional` controls whether the backend also indexes the
    /// reverse direction; hierarchy and AFFECTS edges pass `false`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if either endpoint does not
    /// exist, or [`crate::Error::InvalidArgument`] if an endpoint is not a
    /// vertex or the type is not an edge type.
    fn create_edge(
        &mut self,
        type_name: &str,
        from: NodeId,
        to: NodeId,
        bidirectional: bool,
    ) -> Result<EdgeId>;

    // ========================================================================
    // Completion
    // ========================================================================

    /// Atomically applies all staged operations.
    ///
    /// On any error nothing is applied and the unit of work is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if a unique index would be
    /// violated, [`crate::Error::NotFound`] if a referenced committed
    /// element disappeared, or [`crate::Error::Backend`] for storage-layer
    /// failures.
    fn commit(self: Box<Self>) -> Result<()>;
}
