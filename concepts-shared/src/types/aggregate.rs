use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::source::SourceConcept;

/// A typed value for a schema-declared canonical property.
///
/// The open `properties` map on [`CanonicalAggregate`] only ever carries
/// values of these three shapes; the schema decides which shape each field
/// is allowed to take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    StringList(Vec<String>),
    Int(i64),
}

impl PropertyValue {
    /// Whether the value is empty (or zero) and therefore not persisted.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::String(s) => s.is_empty(),
            PropertyValue::StringList(xs) => xs.is_empty(),
            PropertyValue::Int(i) => *i == 0,
        }
    }
}

/// One real-world concept, merged from one or more source records.
///
/// `aggregate_hash` is recomputed on every write over the cleaned aggregate;
/// the value stored on the canonical node must always equal the hash of the
/// last successfully written aggregate, which is what makes re-submitting an
/// unchanged aggregate a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAggregate {
    #[serde(rename = "prefUUID")]
    pub pref_uuid: String,
    pub pref_label: String,
    /// Most-specific label of the concept's type hierarchy.
    #[serde(rename = "type")]
    pub concept_type: String,
    /// Open map keyed by schema field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default)]
    pub aggregate_hash: String,
    /// Source views of this concept, ordered by uuid.
    pub source_representations: Vec<SourceConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
}

impl CanonicalAggregate {
    /// Uuids of every source representation, in stored order.
    pub fn source_uuids(&self) -> Vec<String> {
        self.source_representations
            .iter()
            .map(|s| s.uuid.clone())
            .collect()
    }

    /// The source acting as the concordance's anchor, if present.
    pub fn anchor_source(&self) -> Option<&SourceConcept> {
        self.source_representations
            .iter()
            .find(|s| s.uuid == self.pref_uuid)
    }
}
