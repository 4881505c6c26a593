use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One data authority's raw view of a concept.
///
/// A source belongs to exactly one canonical node at a time; the resolver,
/// not the store, enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConcept {
    pub uuid: String,
    pub pref_label: String,
    pub authority: String,
    pub authority_value: String,
    #[serde(rename = "type")]
    pub concept_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figi_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub is_deprecated: bool,
}

/// A typed, optionally property-bearing edge from a source node to another
/// node. Which labels and properties are persisted is decided by the schema's
/// relationship configuration, not by this struct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub label: String,
    #[serde(rename = "uuid")]
    pub target_uuid: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}
