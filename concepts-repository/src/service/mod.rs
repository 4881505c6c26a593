//! The concepts service: the surface the transport layer consumes.
//!
//! All durable state lives in the graph store; the service is stateless
//! between requests. Each write is a single request-scoped sequence — read
//! current state, compute the statement batch, execute it as one
//! transaction. Concurrent writes to the same prefUUID remain a documented
//! read-then-write race; the store transaction is the only serialization
//! point.
mod delete;
mod reader;
mod resolver;
mod rows;

pub use reader::EquivalenceRecord;

use concepts_schema::{QueryCompiler, Schema};
use uuid::Uuid;

use crate::errors::ConceptsRepositoryError;
use crate::interfaces::GraphStore;

pub struct ConceptsService {
    store: Box<dyn GraphStore>,
    schema: Schema,
}

impl ConceptsService {
    pub fn new(store: Box<dyn GraphStore>, schema: Schema) -> Self {
        Self { store, schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    pub(crate) fn compiler(&self) -> QueryCompiler<'_> {
        QueryCompiler::new(&self.schema)
    }

    /// Store connectivity probe.
    pub async fn check(&self) -> Result<(), ConceptsRepositoryError> {
        Ok(self.store.check().await?)
    }

    /// Index/constraint setup against the store; run once at startup.
    pub async fn initialise(&self) -> Result<(), ConceptsRepositoryError> {
        Ok(self.store.initialise().await?)
    }

    pub(crate) fn validate_uuid(field: &str, value: &str) -> Result<(), ConceptsRepositoryError> {
        Uuid::parse_str(value).map(|_| ()).map_err(|e| {
            ConceptsRepositoryError::validation(field, format!("invalid UUID: {}", e))
        })
    }
}
