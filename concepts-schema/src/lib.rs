//! # Concepts Schema
//! The declarative description of what the concept graph persists — fields,
//! relationship types, authorities and the concept-type hierarchy — plus the
//! compiler that turns that description into parametrized Cypher statements.
//!
//! The registry is an explicitly constructed, immutable value passed down to
//! whatever needs it, so tests can supply alternate schemas without global
//! side effects. The compiler is a pure function from the registry (and an
//! aggregate, for writes) to [`Statement`] values; for a fixed schema its
//! output is byte-identical across runs.
pub mod compiler;
pub mod errors;
pub mod hierarchy;
pub mod registry;
pub mod statement;

pub use compiler::QueryCompiler;
pub use errors::SchemaError;
pub use hierarchy::TypeHierarchy;
pub use registry::{FieldConfig, PropertyConfig, PropertyKind, RelationshipConfig, Schema};
pub use statement::{ParamValue, Statement};
