//! Read path: execute the compiled read program and rebuild the canonical
//! aggregate from its raw rows.
use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::instrument;

use concepts_schema::{PropertyKind, RelationshipConfig};
use concepts_shared::types::{CanonicalAggregate, PropertyValue, Relationship, SourceConcept};

use super::rows::{opt_bool, opt_i64, opt_str, str_list};
use super::ConceptsService;
use crate::errors::{ConceptsRepositoryError, GraphStoreError};

/// The state of one source id's current concordance, resolved at write time:
/// which canonical it points to, the node's labels and authority, and how
/// many members that concordance has.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceRecord {
    pub pref_uuid: Option<String>,
    pub types: Vec<String>,
    pub equivalence: i64,
    pub authority: Option<String>,
}

impl ConceptsService {
    /// Read one canonical aggregate by its prefUUID.
    #[instrument(skip(self))]
    pub async fn read(
        &self,
        pref_uuid: &str,
    ) -> Result<Option<CanonicalAggregate>, ConceptsRepositoryError> {
        Self::validate_uuid("prefUUID", pref_uuid)?;
        self.read_aggregate(pref_uuid).await
    }

    pub(crate) async fn read_aggregate(
        &self,
        pref_uuid: &str,
    ) -> Result<Option<CanonicalAggregate>, ConceptsRepositoryError> {
        let statement = self.compiler().compile_read(pref_uuid);
        let rows = self.store().fetch_rows(&statement).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        // One row per source; a source appearing twice means the graph shape
        // fanned out (e.g. duplicate ISSUED_BY) and the result is ambiguous.
        let mut seen = BTreeSet::new();
        for row in &rows {
            let source_uuid = opt_str(row, "sourceUUID").ok_or_else(|| {
                GraphStoreError::decode("read row is missing its sourceUUID column")
            })?;
            if !seen.insert(source_uuid) {
                return Err(ConceptsRepositoryError::UnexpectedReadResult {
                    pref_uuid: pref_uuid.to_string(),
                    count: rows.len(),
                });
            }
        }

        let first = &rows[0];
        let types = str_list(first, "types");
        let concept_type = self.schema().hierarchy().most_specific(&types)?;

        let mut properties = BTreeMap::new();
        for field in self.schema().fields() {
            if let Some(value) = read_property(first, field.field, field.kind) {
                properties.insert(field.field.to_string(), value);
            }
        }

        let mut sources = Vec::with_capacity(rows.len());
        for row in &rows {
            sources.push(self.read_source(row)?);
        }

        let mut aggregate = CanonicalAggregate {
            pref_uuid: opt_str(first, "prefUUID").unwrap_or_else(|| pref_uuid.to_string()),
            pref_label: opt_str(first, "prefLabel").unwrap_or_default(),
            concept_type: concept_type.to_string(),
            properties,
            aggregate_hash: opt_str(first, "aggregateHash").unwrap_or_default(),
            source_representations: sources,
            issued_by: rows.iter().find_map(|row| opt_str(row, "issuedBy")),
            is_deprecated: opt_bool(first, "isDeprecated").unwrap_or(false),
        };
        // Re-running the clean pass normalizes ordering and drops empty-id
        // relationship artifacts, so a read compares equal to what was
        // written.
        self.schema().clean_aggregate(&mut aggregate);
        Ok(Some(aggregate))
    }

    fn read_source(&self, row: &Value) -> Result<SourceConcept, ConceptsRepositoryError> {
        let source_types = str_list(row, "sourceTypes");
        let concept_type = self.schema().hierarchy().most_specific(&source_types)?;

        let mut relationships = Vec::new();
        for config in self.schema().relationships() {
            relationships.extend(read_relationships(row, config));
        }

        Ok(SourceConcept {
            uuid: opt_str(row, "sourceUUID").unwrap_or_default(),
            pref_label: opt_str(row, "sourcePrefLabel").unwrap_or_default(),
            authority: opt_str(row, "authority").unwrap_or_default(),
            authority_value: opt_str(row, "authorityValue").unwrap_or_default(),
            concept_type: concept_type.to_string(),
            figi_code: opt_str(row, "figiCode"),
            relationships,
            is_deprecated: opt_bool(row, "sourceIsDeprecated").unwrap_or(false),
        })
    }

    /// Resolve the equivalence record for one source id. `None` means the id
    /// is unknown to the store.
    pub(crate) async fn fetch_equivalence(
        &self,
        uuid: &str,
    ) -> Result<Option<EquivalenceRecord>, ConceptsRepositoryError> {
        let statement = self.compiler().compile_equivalence(uuid);
        let rows = self.store().fetch_rows(&statement).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        Ok(Some(EquivalenceRecord {
            pref_uuid: opt_str(row, "prefUUID"),
            types: str_list(row, "types"),
            equivalence: opt_i64(row, "equivalenceCount").unwrap_or(0),
            authority: opt_str(row, "authority"),
        }))
    }
}

fn read_property(row: &Value, field: &str, kind: PropertyKind) -> Option<PropertyValue> {
    match kind {
        PropertyKind::String | PropertyKind::Date => {
            opt_str(row, field).map(PropertyValue::String)
        }
        PropertyKind::StringList => {
            let values = str_list(row, field);
            (!values.is_empty()).then_some(PropertyValue::StringList(values))
        }
        PropertyKind::Int => opt_i64(row, field)
            .filter(|i| *i != 0)
            .map(PropertyValue::Int),
    }
}

/// Unpack one relationship field per the projection rules. Entries whose
/// target id is empty are artifacts of absent optional matches and are
/// dropped.
fn read_relationships(row: &Value, config: &RelationshipConfig) -> Vec<Relationship> {
    if config.properties.is_empty() {
        let targets = if config.one_to_one {
            opt_str(row, config.concept_field).into_iter().collect()
        } else {
            str_list(row, config.concept_field)
        };
        return targets
            .into_iter()
            .map(|target_uuid| Relationship {
                label: config.label.to_string(),
                target_uuid,
                properties: BTreeMap::new(),
            })
            .collect();
    }

    let Some(entries) = row.get(config.concept_field).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let target_uuid = opt_str(entry, "uuid")?;
            let mut properties = BTreeMap::new();
            for declared in config.properties {
                if let Some(value) = opt_str(entry, declared.name) {
                    properties.insert(declared.name.to_string(), value);
                }
            }
            Some(Relationship {
                label: config.label.to_string(),
                target_uuid,
                properties,
            })
        })
        .collect()
}
