//! In-memory model of the concept graph's domain objects.
mod aggregate;
mod events;
mod source;

pub use aggregate::{CanonicalAggregate, PropertyValue};
pub use events::{ConceptChanges, ConceptEvent, EventKind};
pub use source::{Relationship, SourceConcept};
