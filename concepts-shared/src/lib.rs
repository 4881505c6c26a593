//! # Concepts Shared
//! Shared domain types for the concept graph. This crate holds the in-memory
//! model of a canonical concept aggregate and its source representations, the
//! change events emitted by the write path, and the content hash used to make
//! unchanged writes no-ops. It performs no I/O.
pub mod hash;
pub mod types;

pub use hash::aggregate_hash;
pub use types::{
    CanonicalAggregate, ConceptChanges, ConceptEvent, EventKind, PropertyValue, Relationship,
    SourceConcept,
};
