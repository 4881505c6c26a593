//! Delete-side statement generation: the strip program and the node
//! deletion statements used by the resolver and the delete guard.
use crate::compiler::clause_var;
use crate::registry::Schema;
use crate::statement::Statement;

/// Relationship types owned by the core model rather than the relationship
/// table; the strip program removes these too.
const BUILTIN_RELATIONSHIPS: &[&str] = &["EQUIVALENT_TO", "ISSUED_BY"];

pub(super) fn compile_delete(schema: &Schema, uuid: &str) -> Statement {
    let mut labels: Vec<&str> = BUILTIN_RELATIONSHIPS.to_vec();
    labels.extend(schema.relationships().map(|r| r.label));
    labels.sort_unstable();

    let mut clauses = vec!["MATCH (thing:Thing {uuid: $uuid})".to_string()];
    let mut vars = Vec::with_capacity(labels.len());
    for label in labels {
        let var = format!("{}Rel", clause_var(label));
        clauses.push(format!(
            "OPTIONAL MATCH (thing)-[{var}:{label}]->()",
            var = var,
            label = label,
        ));
        vars.push(var);
    }
    clauses.push(format!("DELETE {}", vars.join(", ")));

    let type_labels: Vec<&str> = schema.hierarchy().known_types().collect();
    clauses.push(format!("REMOVE thing:{}", type_labels.join(":")));
    clauses.push("SET thing = {uuid: thing.uuid}".to_string());

    Statement::new(clauses.join("\n")).param("uuid", uuid)
}

pub(super) fn compile_canonical_delete(pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (canonical:Thing {prefUUID: $prefUUID})\n\
         DETACH DELETE canonical",
    )
    .param("prefUUID", pref_uuid)
}

pub(super) fn compile_concordance_delete(pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (canonical:Thing {prefUUID: $prefUUID})\n\
         OPTIONAL MATCH (canonical)<-[:EQUIVALENT_TO]-(source:Thing)\n\
         DETACH DELETE canonical, source",
    )
    .param("prefUUID", pref_uuid)
}

pub(super) fn compile_reference_check(pref_uuid: &str) -> Statement {
    Statement::new(
        "MATCH (canonical:Thing {prefUUID: $prefUUID})\n\
         OPTIONAL MATCH (canonical)<-[:EQUIVALENT_TO]-(source:Thing)\n\
         WITH canonical, collect(source) AS sources\n\
         UNWIND [canonical] + sources AS owned\n\
         OPTIONAL MATCH (referencer:Thing)-[ref]->(owned)\n\
         WHERE type(ref) <> 'EQUIVALENT_TO' AND NOT referencer IN sources\n\
         WITH DISTINCT referencer\n\
         WHERE referencer IS NOT NULL\n\
         RETURN coalesce(referencer.prefUUID, referencer.uuid) AS referencerUUID",
    )
    .param("prefUUID", pref_uuid)
}
