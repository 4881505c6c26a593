//! Read-side statement generation.
use crate::compiler::clause_var;
use crate::registry::{PropertyKind, RelationshipConfig, Schema};
use crate::statement::Statement;

pub(super) fn compile_read(schema: &Schema, pref_uuid: &str) -> Statement {
    let mut clauses = vec![
        "MATCH (canonical:Thing {prefUUID: $prefUUID})<-[:EQUIVALENT_TO]-(source:Thing)"
            .to_string(),
        "OPTIONAL MATCH (source)-[:ISSUED_BY]->(issuer:Thing)".to_string(),
    ];
    for config in schema.relationships() {
        let var = clause_var(config.label);
        clauses.push(format!(
            "OPTIONAL MATCH (source)-[{var}Rel:{label}]->({var}Node:{target})",
            var = var,
            label = config.label,
            target = config.to_node_with_label,
        ));
    }

    let mut projections = vec![
        "canonical.prefUUID AS prefUUID".to_string(),
        "canonical.prefLabel AS prefLabel".to_string(),
        "labels(canonical) AS types".to_string(),
        "canonical.aggregateHash AS aggregateHash".to_string(),
        "canonical.isDeprecated AS isDeprecated".to_string(),
    ];
    for field in schema.fields() {
        projections.push(format!(
            "canonical.{property} AS {field}",
            property = field.property,
            field = field.field,
        ));
    }
    projections.extend([
        "source.uuid AS sourceUUID".to_string(),
        "source.prefLabel AS sourcePrefLabel".to_string(),
        "source.authority AS authority".to_string(),
        "source.authorityValue AS authorityValue".to_string(),
        "source.figiCode AS figiCode".to_string(),
        "source.isDeprecated AS sourceIsDeprecated".to_string(),
        "labels(source) AS sourceTypes".to_string(),
        "issuer.uuid AS issuedBy".to_string(),
    ]);
    for config in schema.relationships() {
        projections.push(relationship_projection(config));
    }

    let text = format!(
        "{}\nRETURN\n    {}",
        clauses.join("\n"),
        projections.join(",\n    "),
    );
    Statement::new(text).param("prefUUID", pref_uuid)
}

/// Projection rules: a one-to-one relationship with no properties projects
/// as a single target id; a one-to-many relationship with no properties as a
/// collected list of ids; any relationship with properties as a collected
/// list of records carrying the id plus its properties (date-typed
/// properties carry both the string and epoch form).
fn relationship_projection(config: &RelationshipConfig) -> String {
    let var = clause_var(config.label);
    if config.properties.is_empty() {
        if config.one_to_one {
            return format!("{var}Node.uuid AS {field}", var = var, field = config.concept_field);
        }
        return format!(
            "collect(DISTINCT {var}Node.uuid) AS {field}",
            var = var,
            field = config.concept_field,
        );
    }

    let mut entries = vec![format!("uuid: {var}Node.uuid", var = var)];
    let mut properties: Vec<_> = config.properties.to_vec();
    properties.sort_by_key(|p| p.name);
    for property in properties {
        entries.push(format!(
            "{name}: {var}Rel.{name}",
            name = property.name,
            var = var,
        ));
        if property.kind == PropertyKind::Date {
            entries.push(format!(
                "{name}Epoch: {var}Rel.{name}Epoch",
                name = property.name,
                var = var,
            ));
        }
    }
    format!(
        "collect(DISTINCT {{{entries}}}) AS {field}",
        entries = entries.join(", "),
        field = config.concept_field,
    )
}

pub(super) fn compile_equivalence(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (thing:Thing {uuid: $uuid})\n\
         OPTIONAL MATCH (thing)-[:EQUIVALENT_TO]->(canonical:Thing)\n\
         OPTIONAL MATCH (canonical)<-[:EQUIVALENT_TO]-(member:Thing)\n\
         RETURN\n    \
         thing.authority AS authority,\n    \
         labels(thing) AS types,\n    \
         canonical.prefUUID AS prefUUID,\n    \
         count(DISTINCT member) AS equivalenceCount",
    )
    .param("uuid", uuid)
}
