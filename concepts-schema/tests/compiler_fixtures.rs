//! Golden-text fixtures for the query compiler. The compiled statement text
//! must stay byte-identical for a fixed schema; these fixtures pin it.
use concepts_schema::{
    FieldConfig, PropertyConfig, PropertyKind, QueryCompiler, RelationshipConfig, Schema,
    TypeHierarchy,
};

fn fixture_schema() -> Schema {
    Schema::new(
        vec![FieldConfig {
            field: "aliases",
            property: "aliases",
            kind: PropertyKind::StringList,
        }],
        vec![
            RelationshipConfig {
                label: "HAS_BROADER",
                concept_field: "broaderUUIDs",
                one_to_one: false,
                properties: &[],
                to_node_with_label: "Concept",
                neo_create: true,
            },
            RelationshipConfig {
                label: "HAS_ROLE",
                concept_field: "membershipRoles",
                one_to_one: false,
                properties: &[PropertyConfig {
                    name: "inceptionDate",
                    kind: PropertyKind::Date,
                }],
                to_node_with_label: "MembershipRole",
                neo_create: false,
            },
        ],
        &["Smartlogic"],
        &["Smartlogic"],
        TypeHierarchy::new(&[
            ("Concept", None),
            ("MembershipRole", Some("Concept")),
            ("Person", Some("Concept")),
        ]),
    )
}

#[test]
fn read_program_matches_fixture() {
    let schema = fixture_schema();
    let statement = QueryCompiler::new(&schema).compile_read("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93");

    let expected = "\
MATCH (canonical:Thing {prefUUID: $prefUUID})<-[:EQUIVALENT_TO]-(source:Thing)
OPTIONAL MATCH (source)-[:ISSUED_BY]->(issuer:Thing)
OPTIONAL MATCH (source)-[hasBroaderRel:HAS_BROADER]->(hasBroaderNode:Concept)
OPTIONAL MATCH (source)-[hasRoleRel:HAS_ROLE]->(hasRoleNode:MembershipRole)
RETURN
    canonical.prefUUID AS prefUUID,
    canonical.prefLabel AS prefLabel,
    labels(canonical) AS types,
    canonical.aggregateHash AS aggregateHash,
    canonical.isDeprecated AS isDeprecated,
    canonical.aliases AS aliases,
    source.uuid AS sourceUUID,
    source.prefLabel AS sourcePrefLabel,
    source.authority AS authority,
    source.authorityValue AS authorityValue,
    source.figiCode AS figiCode,
    source.isDeprecated AS sourceIsDeprecated,
    labels(source) AS sourceTypes,
    issuer.uuid AS issuedBy,
    collect(DISTINCT hasBroaderNode.uuid) AS broaderUUIDs,
    collect(DISTINCT {uuid: hasRoleNode.uuid, inceptionDate: hasRoleRel.inceptionDate, inceptionDateEpoch: hasRoleRel.inceptionDateEpoch}) AS membershipRoles";

    assert_eq!(statement.text, expected);
    assert_eq!(
        statement.string_param("prefUUID"),
        Some("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93")
    );
}

#[test]
fn strip_program_matches_fixture() {
    let schema = fixture_schema();
    let statement = QueryCompiler::new(&schema).compile_delete("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93");

    let expected = "\
MATCH (thing:Thing {uuid: $uuid})
OPTIONAL MATCH (thing)-[equivalentToRel:EQUIVALENT_TO]->()
OPTIONAL MATCH (thing)-[hasBroaderRel:HAS_BROADER]->()
OPTIONAL MATCH (thing)-[hasRoleRel:HAS_ROLE]->()
OPTIONAL MATCH (thing)-[issuedByRel:ISSUED_BY]->()
DELETE equivalentToRel, hasBroaderRel, hasRoleRel, issuedByRel
REMOVE thing:Concept:MembershipRole:Person
SET thing = {uuid: thing.uuid}";

    assert_eq!(statement.text, expected);
}

#[test]
fn compiled_text_is_stable_across_runs() {
    let schema = fixture_schema();
    let compiler = QueryCompiler::new(&schema);
    assert_eq!(
        compiler.compile_read("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93"),
        compiler.compile_read("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93")
    );
    assert_eq!(
        compiler.compile_delete("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93"),
        compiler.compile_delete("3bba2f09-42fa-45e9-9ad9-64bbe1a03b93")
    );
}
