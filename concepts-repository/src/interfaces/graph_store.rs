//! The `GraphStore` trait: transactional batched writes and row-shaped
//! reads of parametrized statements, abstracting the concrete graph backend
//! so the service can be exercised against an in-memory double.
use concepts_schema::Statement;

use crate::errors::GraphStoreError;

/// A transactional graph-store backend.
///
/// Rows come back as JSON objects keyed by the statement's return aliases,
/// which keeps the service's row handling and the test fixtures in one
/// format.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a batch of statements in a single transaction; either every
    /// statement applies or none do.
    async fn write_batch(&self, statements: &[Statement]) -> Result<(), GraphStoreError>;

    /// Execute one read statement and collect its rows.
    async fn fetch_rows(
        &self,
        statement: &Statement,
    ) -> Result<Vec<serde_json::Value>, GraphStoreError>;

    /// Connectivity probe.
    async fn check(&self) -> Result<(), GraphStoreError>;

    /// One-off index/constraint setup, idempotent.
    async fn initialise(&self) -> Result<(), GraphStoreError>;
}
