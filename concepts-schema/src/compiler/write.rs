//! Write-side statement generation.
use std::collections::BTreeMap;

use concepts_shared::types::{CanonicalAggregate, PropertyValue, SourceConcept};

use crate::compiler::clause_var;
use crate::errors::SchemaError;
use crate::registry::{PropertyKind, RelationshipConfig, Schema};
use crate::statement::{ParamValue, Statement};

pub(super) fn compile_write(
    schema: &Schema,
    aggregate: &CanonicalAggregate,
) -> Result<Vec<Statement>, SchemaError> {
    let mut statements = vec![canonical_upsert(schema, aggregate)?];
    for source in &aggregate.source_representations {
        statements.push(source_upsert(schema, source)?);
        if let Some(issuer) = &aggregate.issued_by {
            statements.push(issued_by_edge(&source.uuid, issuer));
        }
        statements.push(equivalent_to_edge(&source.uuid, &aggregate.pref_uuid));
        for relationship in &source.relationships {
            // Labels outside the schema are not persisted; the resolver's
            // clean pass has already dropped them, this guard keeps the
            // compiler safe on its own.
            if let Some(config) = schema.relationship(&relationship.label) {
                statements.push(relationship_edge(
                    config,
                    &source.uuid,
                    &relationship.target_uuid,
                    &relationship.properties,
                ));
            }
        }
    }
    Ok(statements)
}

fn canonical_upsert(
    schema: &Schema,
    aggregate: &CanonicalAggregate,
) -> Result<Statement, SchemaError> {
    let labels = schema.hierarchy().label_chain(&aggregate.concept_type)?;

    let mut props: BTreeMap<String, ParamValue> = BTreeMap::new();
    props.insert(
        "prefUUID".to_string(),
        ParamValue::String(aggregate.pref_uuid.clone()),
    );
    props.insert(
        "prefLabel".to_string(),
        ParamValue::String(aggregate.pref_label.clone()),
    );
    props.insert(
        "aggregateHash".to_string(),
        ParamValue::String(aggregate.aggregate_hash.clone()),
    );
    if aggregate.is_deprecated {
        props.insert("isDeprecated".to_string(), ParamValue::Bool(true));
    }
    for field in schema.fields() {
        if let Some(value) = validated_property(aggregate, field.field, field.kind) {
            props.insert(field.property.to_string(), value);
        }
    }

    let text = format!(
        "MERGE (canonical:Thing {{prefUUID: $prefUUID}})\n\
         SET canonical = $props\n\
         SET canonical:{labels}",
        labels = labels.join(":"),
    );
    Ok(Statement::new(text)
        .param("prefUUID", aggregate.pref_uuid.as_str())
        .param("props", ParamValue::Map(props)))
}

/// A canonical property is persisted only when the field is present,
/// non-empty (non-zero for ints) and matches the schema's declared shape.
fn validated_property(
    aggregate: &CanonicalAggregate,
    field: &str,
    kind: PropertyKind,
) -> Option<ParamValue> {
    let value = aggregate.properties.get(field)?;
    if value.is_empty() {
        return None;
    }
    match (kind, value) {
        (PropertyKind::String, PropertyValue::String(s)) => Some(ParamValue::String(s.clone())),
        (PropertyKind::StringList, PropertyValue::StringList(xs)) => {
            Some(ParamValue::StringList(xs.clone()))
        }
        (PropertyKind::Int, PropertyValue::Int(i)) => Some(ParamValue::Int(*i)),
        _ => None,
    }
}

fn source_upsert(schema: &Schema, source: &SourceConcept) -> Result<Statement, SchemaError> {
    let labels = schema.hierarchy().label_chain(&source.concept_type)?;

    let mut props: BTreeMap<String, ParamValue> = BTreeMap::new();
    props.insert("uuid".to_string(), ParamValue::String(source.uuid.clone()));
    props.insert(
        "prefLabel".to_string(),
        ParamValue::String(source.pref_label.clone()),
    );
    props.insert(
        "authority".to_string(),
        ParamValue::String(source.authority.clone()),
    );
    props.insert(
        "authorityValue".to_string(),
        ParamValue::String(source.authority_value.clone()),
    );
    if let Some(figi) = &source.figi_code {
        props.insert("figiCode".to_string(), ParamValue::String(figi.clone()));
    }
    props.insert(
        "isDeprecated".to_string(),
        ParamValue::Bool(source.is_deprecated),
    );

    let text = format!(
        "MERGE (source:Thing {{uuid: $uuid}})\n\
         SET source = $props\n\
         SET source:{labels}",
        labels = labels.join(":"),
    );
    Ok(Statement::new(text)
        .param("uuid", source.uuid.as_str())
        .param("props", ParamValue::Map(props)))
}

fn issued_by_edge(source_uuid: &str, issuer_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (source:Thing {uuid: $uuid})\n\
         MERGE (issuer:Thing {uuid: $issuerUUID})\n\
         MERGE (source)-[:ISSUED_BY]->(issuer)",
    )
    .param("uuid", source_uuid)
    .param("issuerUUID", issuer_uuid)
}

fn equivalent_to_edge(source_uuid: &str, pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (source:Thing {uuid: $uuid})\n\
         MATCH (canonical:Thing {prefUUID: $prefUUID})\n\
         MERGE (source)-[:EQUIVALENT_TO]->(canonical)",
    )
    .param("uuid", source_uuid)
    .param("prefUUID", pref_uuid)
}

fn relationship_edge(
    config: &RelationshipConfig,
    source_uuid: &str,
    target_uuid: &str,
    properties: &BTreeMap<String, String>,
) -> Statement {
    let var = clause_var(config.label);
    // NeoCreate relationships may bring their own target (and source) into
    // existence; all others require the source endpoint to already exist.
    let source_clause = if config.neo_create {
        "MERGE (source:Thing {uuid: $uuid})"
    } else {
        "MATCH (source:Thing {uuid: $uuid})"
    };
    let mut text = format!(
        "{source_clause}\n\
         MERGE (target:Thing {{uuid: $targetUUID}})\n\
         MERGE (source)-[{var}Rel:{label}]->(target)",
        source_clause = source_clause,
        var = var,
        label = config.label,
    );

    let props = relationship_properties(config, properties);
    if props.is_empty() {
        return Statement::new(text)
            .param("uuid", source_uuid)
            .param("targetUUID", target_uuid);
    }
    text.push_str(&format!("\nSET {var}Rel = $relProps", var = var));
    Statement::new(text)
        .param("uuid", source_uuid)
        .param("targetUUID", target_uuid)
        .param("relProps", ParamValue::Map(props))
}

fn relationship_properties(
    config: &RelationshipConfig,
    properties: &BTreeMap<String, String>,
) -> BTreeMap<String, ParamValue> {
    let mut props = BTreeMap::new();
    for declared in config.properties {
        let Some(value) = properties.get(declared.name).filter(|v| !v.is_empty()) else {
            continue;
        };
        props.insert(
            declared.name.to_string(),
            ParamValue::String(value.clone()),
        );
        if declared.kind == PropertyKind::Date {
            if let Some(epoch) = date_epoch(value) {
                props.insert(format!("{}Epoch", declared.name), ParamValue::Int(epoch));
            }
        }
    }
    props
}

/// Epoch seconds for a date property value. Dates that fail to parse, or
/// whose epoch would be non-positive, keep the string form only.
fn date_epoch(value: &str) -> Option<i64> {
    let epoch = if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(value) {
        datetime.timestamp()
    } else {
        let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        date.and_hms_opt(0, 0, 0)?.and_utc().timestamp()
    };
    (epoch > 0).then_some(epoch)
}

pub(super) fn compile_issuer_check(issuer_uuid: &str, pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (issuer:Thing {uuid: $issuerUUID})<-[:ISSUED_BY]-(source:Thing)\
         -[:EQUIVALENT_TO]->(canonical:Thing)\n\
         WHERE canonical.prefUUID <> $prefUUID\n\
         RETURN DISTINCT canonical.prefUUID AS issuedByPrefUUID",
    )
    .param("issuerUUID", issuer_uuid)
    .param("prefUUID", pref_uuid)
}

pub(super) fn compile_issuer_clear(issuer_uuid: &str, stale_pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (issuer:Thing {uuid: $issuerUUID})<-[ref:ISSUED_BY]-(source:Thing)\
         -[:EQUIVALENT_TO]->(canonical:Thing {prefUUID: $prefUUID})\n\
         DELETE ref",
    )
    .param("issuerUUID", issuer_uuid)
    .param("prefUUID", stale_pref_uuid)
}
