//! The schema registry: which fields and relationship types are persisted,
//! which authorities may contribute sources, and how concept types relate.
//!
//! Pure data with lookup methods — all behavior that consumes it lives in the
//! compiler and the repository service.
use std::collections::{BTreeMap, BTreeSet};

use concepts_shared::types::CanonicalAggregate;

use crate::hierarchy::TypeHierarchy;

/// Value shape of a persisted property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    StringList,
    Int,
    /// Stored as its string form plus a derived `<name>Epoch` integer.
    Date,
}

/// A canonical-node field: the aggregate-level field name, the property name
/// it is stored under (the two may differ), and its value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    pub field: &'static str,
    pub property: &'static str,
    pub kind: PropertyKind,
}

/// A typed property carried on a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyConfig {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// Declarative description of one relationship type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipConfig {
    pub label: &'static str,
    /// Aggregate-level field the edge maps to on the read side.
    pub concept_field: &'static str,
    /// Single target vs many.
    pub one_to_one: bool,
    pub properties: &'static [PropertyConfig],
    /// Label the target node must carry on the read side.
    pub to_node_with_label: &'static str,
    /// Whether edge creation may create a missing target node, or must match
    /// an existing source endpoint.
    pub neo_create: bool,
}

/// The immutable schema a service instance runs against.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldConfig>,
    relationships: BTreeMap<&'static str, RelationshipConfig>,
    authorities: BTreeSet<&'static str>,
    overridable_authorities: BTreeSet<&'static str>,
    hierarchy: TypeHierarchy,
}

const ROLE_PROPERTIES: &[PropertyConfig] = &[
    PropertyConfig {
        name: "inceptionDate",
        kind: PropertyKind::Date,
    },
    PropertyConfig {
        name: "terminationDate",
        kind: PropertyKind::Date,
    },
];

impl Schema {
    pub fn new(
        mut fields: Vec<FieldConfig>,
        relationships: Vec<RelationshipConfig>,
        authorities: &[&'static str],
        overridable_authorities: &[&'static str],
        hierarchy: TypeHierarchy,
    ) -> Self {
        fields.sort_by_key(|f| f.field);
        Self {
            fields,
            relationships: relationships.into_iter().map(|r| (r.label, r)).collect(),
            authorities: authorities.iter().copied().collect(),
            overridable_authorities: overridable_authorities.iter().copied().collect(),
            hierarchy,
        }
    }

    /// The core concept schema.
    pub fn core() -> Self {
        Self::new(
            vec![
                FieldConfig {
                    field: "aliases",
                    property: "aliases",
                    kind: PropertyKind::StringList,
                },
                FieldConfig {
                    field: "birthYear",
                    property: "birthYear",
                    kind: PropertyKind::Int,
                },
                FieldConfig {
                    field: "description",
                    property: "description",
                    kind: PropertyKind::String,
                },
                FieldConfig {
                    field: "imageUrl",
                    property: "_imageUrl",
                    kind: PropertyKind::String,
                },
                FieldConfig {
                    field: "salutation",
                    property: "salutation",
                    kind: PropertyKind::String,
                },
                FieldConfig {
                    field: "shortLabel",
                    property: "shortLabel",
                    kind: PropertyKind::String,
                },
                FieldConfig {
                    field: "strapline",
                    property: "strapline",
                    kind: PropertyKind::String,
                },
                FieldConfig {
                    field: "yearFounded",
                    property: "yearFounded",
                    kind: PropertyKind::Int,
                },
            ],
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
                    label: "HAS_INDUSTRY_CLASSIFICATION",
                    concept_field: "industryIdentifier",
                    one_to_one: true,
                    properties: &[],
                    to_node_with_label: "IndustryClassification",
                    neo_create: true,
                },
                RelationshipConfig {
                    label: "HAS_MEMBER",
                    concept_field: "personUUID",
                    one_to_one: true,
                    properties: &[],
                    to_node_with_label: "Person",
                    neo_create: false,
                },
                RelationshipConfig {
                    label: "HAS_ORGANISATION",
                    concept_field: "organisationUUID",
                    one_to_one: true,
                    properties: &[],
                    to_node_with_label: "Organisation",
                    neo_create: false,
                },
                RelationshipConfig {
                    label: "HAS_ROLE",
                    concept_field: "membershipRoles",
                    one_to_one: false,
                    properties: ROLE_PROPERTIES,
                    to_node_with_label: "MembershipRole",
                    neo_create: false,
                },
                RelationshipConfig {
                    label: "IS_RELATED_TO",
                    concept_field: "relatedUUIDs",
                    one_to_one: false,
                    properties: &[],
                    to_node_with_label: "Concept",
                    neo_create: true,
                },
                RelationshipConfig {
                    label: "SUPERSEDED_BY",
                    concept_field: "supersededByUUIDs",
                    one_to_one: false,
                    properties: &[],
                    to_node_with_label: "Concept",
                    neo_create: true,
                },
            ],
            &[
                "FactSet",
                "Geonames",
                "ManagedLocation",
                "Smartlogic",
                "TME",
                "Wikidata",
            ],
            // Authorities whose lone concordances may be superseded by an
            // incoming write under a different authority. Kept as data, in
            // one place, pending product confirmation of anything broader.
            &["ManagedLocation", "Smartlogic"],
            TypeHierarchy::core(),
        )
    }

    /// Field configs, sorted by field name.
    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    /// Relationship configs, sorted by label.
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipConfig> {
        self.relationships.values()
    }

    pub fn relationship(&self, label: &str) -> Option<&RelationshipConfig> {
        self.relationships.get(label)
    }

    pub fn is_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn is_overridable_authority(&self, authority: &str) -> bool {
        self.overridable_authorities.contains(authority)
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Normalize an incoming aggregate before hashing: drop source-level
    /// relationship data the schema does not persist, and fix the ordering
    /// of sources and relationships so equal content hashes equally.
    pub fn clean_aggregate(&self, aggregate: &mut CanonicalAggregate) {
        for source in &mut aggregate.source_representations {
            source.relationships.retain(|rel| {
                !rel.target_uuid.is_empty() && self.relationships.contains_key(rel.label.as_str())
            });
            for rel in &mut source.relationships {
                let declared = self
                    .relationships
                    .get(rel.label.as_str())
                    .map(|config| config.properties)
                    .unwrap_or(&[]);
                rel.properties.retain(|name, value| {
                    !value.is_empty() && declared.iter().any(|p| p.name == name.as_str())
                });
            }
            source
                .relationships
                .sort_by(|a, b| (&a.label, &a.target_uuid).cmp(&(&b.label, &b.target_uuid)));
        }
        aggregate
            .source_representations
            .sort_by(|a, b| a.uuid.cmp(&b.uuid));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use concepts_shared::types::{Relationship, SourceConcept};

    use super::*;

    fn membership_source() -> SourceConcept {
        SourceConcept {
            uuid: "87cda39a-e354-4dfd-acb9-5b0b1bd59dd8".to_string(),
            pref_label: "Chair".to_string(),
            authority: "Smartlogic".to_string(),
            authority_value: "chair-1".to_string(),
            concept_type: "Membership".to_string(),
            figi_code: None,
            relationships: vec![
                Relationship {
                    label: "HAS_ROLE".to_string(),
                    target_uuid: "d4050fc0-ff2d-45d1-abb0-81b0b9c2c0b9".to_string(),
                    properties: BTreeMap::from([
                        ("inceptionDate".to_string(), "2011-06-27".to_string()),
                        ("membershipNotes".to_string(), "ad-hoc".to_string()),
                    ]),
                },
                Relationship {
                    label: "SPONSORED_BY".to_string(),
                    target_uuid: "0e2dbdee-b708-4dc1-8c18-bd2a5c7ac87a".to_string(),
                    properties: BTreeMap::new(),
                },
            ],
            is_deprecated: false,
        }
    }

    fn aggregate() -> CanonicalAggregate {
        CanonicalAggregate {
            pref_uuid: "87cda39a-e354-4dfd-acb9-5b0b1bd59dd8".to_string(),
            pref_label: "Chair".to_string(),
            concept_type: "Membership".to_string(),
            properties: BTreeMap::new(),
            aggregate_hash: String::new(),
            source_representations: vec![membership_source()],
            issued_by: None,
            is_deprecated: false,
        }
    }

    #[test]
    fn test_clean_drops_unknown_relationship_labels() {
        let schema = Schema::core();
        let mut agg = aggregate();
        schema.clean_aggregate(&mut agg);

        let labels: Vec<&str> = agg.source_representations[0]
            .relationships
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["HAS_ROLE"]);
    }

    #[test]
    fn test_clean_drops_undeclared_relationship_properties() {
        let schema = Schema::core();
        let mut agg = aggregate();
        schema.clean_aggregate(&mut agg);

        let props = &agg.source_representations[0].relationships[0].properties;
        assert!(props.contains_key("inceptionDate"));
        assert!(!props.contains_key("membershipNotes"));
    }

    #[test]
    fn test_clean_sorts_sources_by_uuid() {
        let schema = Schema::core();
        let mut agg = aggregate();
        let mut second = membership_source();
        second.uuid = "00f71dbc-5427-42ae-ad0b-0df6d1f5bfdb".to_string();
        agg.source_representations.push(second);

        schema.clean_aggregate(&mut agg);
        assert_eq!(
            agg.source_representations[0].uuid,
            "00f71dbc-5427-42ae-ad0b-0df6d1f5bfdb"
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let schema = Schema::core();
        let mut once = aggregate();
        schema.clean_aggregate(&mut once);
        let mut twice = once.clone();
        schema.clean_aggregate(&mut twice);
        assert_eq!(once, twice);
    }
}
