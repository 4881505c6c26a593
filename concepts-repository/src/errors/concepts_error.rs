//! The error taxonomy of the concepts service.
//!
//! Validation and concordance-conflict errors are always raised before any
//! statement executes, so they are safe to retry after caller correction.
//! Store errors surface the backend failure as-is; re-submitting the same
//! aggregate is safe because the hash check makes unchanged writes no-ops.
use concepts_shared::types::ConceptChanges;
use thiserror::Error;

use super::GraphStoreError;
use concepts_schema::SchemaError;

#[derive(Debug, Error)]
pub enum ConceptsRepositoryError {
    /// Bad input; named after the first violated field. Never touches the
    /// store.
    #[error("Validation error on {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The write would silently corrupt an existing concordance, or data was
    /// found in an unsupported configuration. Aborts before any mutation.
    #[error("Concordance conflict involving {pref_uuid}: {reason}")]
    ConcordanceConflict { pref_uuid: String, reason: String },

    /// Backend failure on a read-side query.
    #[error("Store error: {0}")]
    Store(#[from] GraphStoreError),

    /// Backend failure while committing the write batch. The change set the
    /// batch would have produced is attached for inspection; no event in it
    /// should be treated as delivered.
    #[error("Store error while committing write: {source}")]
    CommitFailed {
        source: GraphStoreError,
        changes: ConceptChanges,
    },

    #[error("Concept not found: {uuid}")]
    NotFound { uuid: String },

    /// The uuid resolves to a source concept; the canonical anchor must be
    /// deleted instead.
    #[error("{uuid} is a source concept of canonical {canonical}")]
    DeleteSource { uuid: String, canonical: String },

    /// Other concepts hold relationships into the deletion target.
    #[error("Concept {uuid} is referenced by other concepts: {referencers:?}")]
    DeleteRelated {
        uuid: String,
        referencers: Vec<String>,
    },

    /// The read program returned more than one logically distinct row per
    /// source, e.g. duplicate `ISSUED_BY` fan-out.
    #[error("Unexpected read result count for {pref_uuid}: {count} rows")]
    UnexpectedReadResult { pref_uuid: String, count: usize },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl ConceptsRepositoryError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn conflict(pref_uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConcordanceConflict {
            pref_uuid: pref_uuid.into(),
            reason: reason.into(),
        }
    }
}
