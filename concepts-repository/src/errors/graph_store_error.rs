//! Transport-level errors from the graph store backend.
use thiserror::Error;

/// Errors from the store backend. Driver errors are carried as strings so
/// the type stays cloneable and backend-agnostic.
#[derive(Debug, Clone, Error)]
pub enum GraphStoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Row decode error: {0}")]
    Decode(String),
}

impl GraphStoreError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
