//! Data models for graphseries.
//!
//! This module contains the core data structures shared between the storage
//! layer and the benchmark services: graph elements, schema metadata, the
//! write-strategy enum, and the benchmark report.

mod element;
mod report;
pub mod schema;
mod strategy;

pub use element::{Edge, EdgeId, ElementKind, Node, NodeId, Properties};
pub use report::{BenchmarkReport, SensorTiming};
pub use schema::{PropertyType, SchemaType, TypeKind};
pub use strategy::WriteStrategy;
