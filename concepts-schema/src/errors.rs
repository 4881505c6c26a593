//! Error types for schema lookups and label resolution.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown concept type: {0}")]
    UnknownType(String),

    #[error("no known concept type among labels: {labels:?}")]
    NoKnownType { labels: Vec<String> },

    #[error("label set does not form a single type chain: {labels:?}")]
    AmbiguousLabels { labels: Vec<String> },
}
