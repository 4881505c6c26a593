//! # Concepts Repository
//! This crate provides the graph-store seam and the high-level concepts
//! service. It includes the error taxonomy, the `GraphStore` trait, a Neo4j
//! implementation over `neo4rs`, and the service that resolves concordances
//! on write, reconstructs aggregates on read, and guards deletes.
pub mod errors;
pub mod interfaces;
pub mod neo4j;
pub mod service;

pub use errors::{ConceptsRepositoryError, GraphStoreError};
pub use interfaces::GraphStore;
pub use neo4j::Neo4jGraphStore;
pub use service::ConceptsService;
