//! Error types for the concepts repository.
mod concepts_error;
mod graph_store_error;

pub use concepts_error::ConceptsRepositoryError;
pub use graph_store_error::GraphStoreError;
