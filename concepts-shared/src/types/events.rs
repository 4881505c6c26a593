use serde::{Deserialize, Serialize};

/// What happened to a concept during a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all_fields = "camelCase")]
pub enum EventKind {
    ConceptUpdated,
    ConcordanceAdded { old_id: String, new_id: String },
    ConcordanceRemoved { old_id: String, new_id: String },
}

/// A single change notification produced by the write path, serialized for
/// downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptEvent {
    pub concept_type: String,
    #[serde(rename = "conceptUUID")]
    pub concept_uuid: String,
    pub aggregate_hash: String,
    pub transaction_id: String,
    #[serde(flatten)]
    pub event: EventKind,
}

impl ConceptEvent {
    pub fn updated(
        concept_type: &str,
        concept_uuid: &str,
        aggregate_hash: &str,
        transaction_id: &str,
    ) -> Self {
        Self {
            concept_type: concept_type.to_string(),
            concept_uuid: concept_uuid.to_string(),
            aggregate_hash: aggregate_hash.to_string(),
            transaction_id: transaction_id.to_string(),
            event: EventKind::ConceptUpdated,
        }
    }

    pub fn concordance_added(
        concept_type: &str,
        old_id: &str,
        new_id: &str,
        aggregate_hash: &str,
        transaction_id: &str,
    ) -> Self {
        Self {
            concept_type: concept_type.to_string(),
            concept_uuid: old_id.to_string(),
            aggregate_hash: aggregate_hash.to_string(),
            transaction_id: transaction_id.to_string(),
            event: EventKind::ConcordanceAdded {
                old_id: old_id.to_string(),
                new_id: new_id.to_string(),
            },
        }
    }

    pub fn concordance_removed(
        concept_type: &str,
        old_id: &str,
        new_id: &str,
        aggregate_hash: &str,
        transaction_id: &str,
    ) -> Self {
        Self {
            concept_type: concept_type.to_string(),
            concept_uuid: new_id.to_string(),
            aggregate_hash: aggregate_hash.to_string(),
            transaction_id: transaction_id.to_string(),
            event: EventKind::ConcordanceRemoved {
                old_id: old_id.to_string(),
                new_id: new_id.to_string(),
            },
        }
    }
}

/// The outcome of one write: the events to notify downstream with and the
/// de-duplicated set of source ids the write touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptChanges {
    pub events: Vec<ConceptEvent>,
    #[serde(rename = "updatedIDs")]
    pub updated_ids: Vec<String>,
}

impl ConceptChanges {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.updated_ids.is_empty()
    }
}
