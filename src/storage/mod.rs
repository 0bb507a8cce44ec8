//! Storage layer abstraction.
//!
//! The benchmark core treats the underlying graph/document store as an
//! opaque collaborator behind two traits:
//!
//! - [`StoreBackend`]: schema management, unit-of-work creation, and
//!   read-only snapshots of committed state.
//! - [`StoreTransaction`]: the atomic unit of work. Operations staged on a
//!   transaction commit together or are discarded together; dropping a
//!   transaction without committing rolls it back.
//!
//! # Available Implementations
//!
//! | Backend | Use Case | Features |
//! |---------|----------|----------|
//! | [`InMemoryStore`] | Default; benchmarks and tests | Staged transactions, unique indexes, schema validation |
//!
//! The in-memory store exists to make the logical contract executable; it
//! implements no durability, real indexing, or concurrency control beyond
//! what the contract requires.

pub mod memory;
pub mod traits;

pub use memory::InMemoryStore;
pub use traits::{StoreBackend, StoreTransaction};
