//! Shared test doubles and fixture builders for service-level tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use concepts_repository::{GraphStore, GraphStoreError};
use concepts_schema::{Schema, Statement};
use concepts_shared::hash::aggregate_hash;
use concepts_shared::types::{CanonicalAggregate, PropertyValue, Relationship, SourceConcept};

pub const PREF: &str = "3b3201a0-5b0a-4fd3-a03f-b7c9dbf7f4b2";
pub const SRC_X: &str = "8d5c7cfe-9550-4f4c-a4a4-0d03e88ff07b";
pub const SRC_Y: &str = "f21a5bf6-32b2-45b3-b4c0-24ba57b4d9f2";
pub const OTHER: &str = "49a55f2e-03e0-4ba5-b0a1-0a9f30accf03";
pub const ISSUER: &str = "6b2f01c9-9d15-46ac-b5f2-0cfcfe979d43";

/// Mock store for testing: records every committed batch and serves canned
/// rows per query shape.
pub struct MockGraphStore {
    pub batches: Arc<Mutex<Vec<Vec<Statement>>>>,
    pub read_rows: HashMap<String, Vec<Value>>,
    pub equivalence_rows: HashMap<String, Vec<Value>>,
    pub issuer_rows: Vec<Value>,
    pub reference_rows: Vec<Value>,
    pub fail_writes: bool,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(Mutex::new(Vec::new())),
            read_rows: HashMap::new(),
            equivalence_rows: HashMap::new(),
            issuer_rows: Vec::new(),
            reference_rows: Vec::new(),
            fail_writes: false,
        }
    }

    /// Serve a stored aggregate on the read program.
    pub fn with_stored(mut self, schema: &Schema, aggregate: &CanonicalAggregate) -> Self {
        let stored = stored(schema, aggregate);
        self.read_rows
            .insert(stored.pref_uuid.clone(), read_rows(schema, &stored));
        self
    }

    pub fn with_equivalence(mut self, uuid: &str, row: Value) -> Self {
        self.equivalence_rows.insert(uuid.to_string(), vec![row]);
        self
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn write_batch(&self, statements: &[Statement]) -> Result<(), GraphStoreError> {
        if self.fail_writes {
            return Err(GraphStoreError::transaction("mock failure"));
        }
        self.batches.lock().await.push(statements.to_vec());
        Ok(())
    }

    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Value>, GraphStoreError> {
        if statement.text.contains("referencerUUID") {
            return Ok(self.reference_rows.clone());
        }
        if statement.text.contains("issuedByPrefUUID") {
            return Ok(self.issuer_rows.clone());
        }
        if statement.text.contains("equivalenceCount") {
            let uuid = statement.string_param("uuid").unwrap_or_default();
            return Ok(self.equivalence_rows.get(uuid).cloned().unwrap_or_default());
        }
        if statement.text.starts_with("MATCH (canonical:Thing {prefUUID: $prefUUID})") {
            let pref_uuid = statement.string_param("prefUUID").unwrap_or_default();
            return Ok(self.read_rows.get(pref_uuid).cloned().unwrap_or_default());
        }
        Ok(Vec::new())
    }

    async fn check(&self) -> Result<(), GraphStoreError> {
        Ok(())
    }

    async fn initialise(&self) -> Result<(), GraphStoreError> {
        Ok(())
    }
}

pub fn source(uuid: &str, authority: &str) -> SourceConcept {
    SourceConcept {
        uuid: uuid.to_string(),
        pref_label: "Acme Holdings".to_string(),
        authority: authority.to_string(),
        authority_value: format!("av-{}", &uuid[..8]),
        concept_type: "Organisation".to_string(),
        figi_code: None,
        relationships: vec![],
        is_deprecated: false,
    }
}

pub fn aggregate(pref_uuid: &str, source_uuids: &[&str]) -> CanonicalAggregate {
    CanonicalAggregate {
        pref_uuid: pref_uuid.to_string(),
        pref_label: "Acme Holdings".to_string(),
        concept_type: "Organisation".to_string(),
        properties: BTreeMap::new(),
        aggregate_hash: String::new(),
        source_representations: source_uuids
            .iter()
            .map(|uuid| source(uuid, "Smartlogic"))
            .collect(),
        issued_by: None,
        is_deprecated: false,
    }
}

/// The stored form of an aggregate: cleaned, with its content hash set.
pub fn stored(schema: &Schema, aggregate: &CanonicalAggregate) -> CanonicalAggregate {
    let mut stored = aggregate.clone();
    schema.clean_aggregate(&mut stored);
    stored.aggregate_hash = aggregate_hash(&stored);
    stored
}

fn labels_of(schema: &Schema, concept_type: &str) -> Vec<String> {
    std::iter::once("Thing".to_string())
        .chain(
            schema
                .hierarchy()
                .label_chain(concept_type)
                .unwrap()
                .iter()
                .map(|label| label.to_string()),
        )
        .collect()
}

fn property_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::String(s) => json!(s),
        PropertyValue::StringList(xs) => json!(xs),
        PropertyValue::Int(i) => json!(i),
    }
}

/// Rows the read program would return for an aggregate: one per source, with
/// relationship targets projected per the schema's rules.
pub fn read_rows(schema: &Schema, aggregate: &CanonicalAggregate) -> Vec<Value> {
    aggregate
        .source_representations
        .iter()
        .map(|src| {
            let mut row = serde_json::Map::new();
            row.insert("prefUUID".to_string(), json!(aggregate.pref_uuid));
            row.insert("prefLabel".to_string(), json!(aggregate.pref_label));
            row.insert(
                "types".to_string(),
                json!(labels_of(schema, &aggregate.concept_type)),
            );
            row.insert(
                "aggregateHash".to_string(),
                json!(aggregate.aggregate_hash),
            );
            row.insert("isDeprecated".to_string(), json!(aggregate.is_deprecated));
            for (field, value) in &aggregate.properties {
                row.insert(field.clone(), property_json(value));
            }

            row.insert("sourceUUID".to_string(), json!(src.uuid));
            row.insert("sourcePrefLabel".to_string(), json!(src.pref_label));
            row.insert("authority".to_string(), json!(src.authority));
            row.insert("authorityValue".to_string(), json!(src.authority_value));
            row.insert(
                "sourceIsDeprecated".to_string(),
                json!(src.is_deprecated),
            );
            row.insert(
                "sourceTypes".to_string(),
                json!(labels_of(schema, &src.concept_type)),
            );
            if let Some(figi) = &src.figi_code {
                row.insert("figiCode".to_string(), json!(figi));
            }
            if let Some(issuer) = &aggregate.issued_by {
                row.insert("issuedBy".to_string(), json!(issuer));
            }

            for config in schema.relationships() {
                let rels: Vec<&Relationship> = src
                    .relationships
                    .iter()
                    .filter(|r| r.label == config.label)
                    .collect();
                if config.properties.is_empty() {
                    if config.one_to_one {
                        if let Some(rel) = rels.first() {
                            row.insert(
                                config.concept_field.to_string(),
                                json!(rel.target_uuid),
                            );
                        }
                    } else {
                        row.insert(
                            config.concept_field.to_string(),
                            json!(rels
                                .iter()
                                .map(|r| r.target_uuid.clone())
                                .collect::<Vec<_>>()),
                        );
                    }
                } else {
                    let entries: Vec<Value> = rels
                        .iter()
                        .map(|r| {
                            let mut entry = serde_json::Map::new();
                            entry.insert("uuid".to_string(), json!(r.target_uuid));
                            for (name, value) in &r.properties {
                                entry.insert(name.clone(), json!(value));
                            }
                            Value::Object(entry)
                        })
                        .collect();
                    row.insert(config.concept_field.to_string(), Value::Array(entries));
                }
            }
            Value::Object(row)
        })
        .collect()
}

pub fn equivalence_row(pref_uuid: Option<&str>, authority: &str, count: i64) -> Value {
    json!({
        "prefUUID": pref_uuid,
        "authority": authority,
        "types": ["Thing", "Concept", "Organisation"],
        "equivalenceCount": count,
    })
}
