//! Benchmark services.
//!
//! Services orchestrate the storage adapter and provide the operations the
//! benchmark driver consumes: schema management and seeding, date-hierarchy
//! resolution, strategy-polymorphic record writing, random edge generation,
//! and the timed run itself.

mod benchmark;
mod edges;
mod hierarchy;
mod schema;
mod writer;

pub use benchmark::{BenchmarkRunner, SENTINEL_VALUE};
pub use edges::RandomEdgeGenerator;
pub use hierarchy::DateHierarchy;
pub use schema::SchemaService;
pub use writer::RecordWriter;
