//! Single-inheritance concept-type lattice.
//!
//! Every concept type has at most one direct parent. Nodes in the graph carry
//! the full label chain of their type (plus the base `Thing` label), and the
//! read path resolves the most specific type from whatever label set comes
//! back.
use std::collections::BTreeMap;

use crate::errors::SchemaError;

/// Parent-pointer table over concept types.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    parents: BTreeMap<&'static str, Option<&'static str>>,
}

impl TypeHierarchy {
    pub fn new(entries: &[(&'static str, Option<&'static str>)]) -> Self {
        Self {
            parents: entries.iter().copied().collect(),
        }
    }

    /// The core concept ontology.
    pub fn core() -> Self {
        Self::new(&[
            ("Concept", None),
            ("Brand", Some("Concept")),
            ("Classification", Some("Concept")),
            ("Section", Some("Classification")),
            ("Subject", Some("Classification")),
            ("IndustryClassification", Some("Classification")),
            ("Topic", Some("Concept")),
            ("Location", Some("Concept")),
            ("Person", Some("Concept")),
            ("Organisation", Some("Concept")),
            ("Company", Some("Organisation")),
            ("PublicCompany", Some("Company")),
            ("Membership", Some("Concept")),
            ("MembershipRole", Some("Concept")),
            ("BoardRole", Some("MembershipRole")),
            ("FinancialInstrument", Some("Concept")),
        ])
    }

    pub fn is_known(&self, concept_type: &str) -> bool {
        self.parents.contains_key(concept_type)
    }

    /// All known type names, sorted.
    pub fn known_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parents.keys().copied()
    }

    /// Whether `ancestor` appears on `concept_type`'s parent chain
    /// (a type is an ancestor of itself).
    pub fn is_ancestor(&self, ancestor: &str, concept_type: &str) -> bool {
        let mut current = Some(concept_type);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.parents.get(t).copied().flatten();
        }
        false
    }

    /// Label chain from the root type down to `concept_type`, excluding the
    /// base `Thing` label.
    pub fn label_chain(&self, concept_type: &str) -> Result<Vec<&'static str>, SchemaError> {
        let (&key, _) = self
            .parents
            .get_key_value(concept_type)
            .ok_or_else(|| SchemaError::UnknownType(concept_type.to_string()))?;

        let mut chain = vec![key];
        let mut current = self.parents.get(key).copied().flatten();
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parents.get(parent).copied().flatten();
        }
        chain.reverse();
        Ok(chain)
    }

    /// Resolve the most specific type from a node's label set: the known
    /// label of which every other known label is an ancestor. Label sets
    /// that do not form a single chain are rejected.
    pub fn most_specific(&self, labels: &[String]) -> Result<&'static str, SchemaError> {
        let known: Vec<&'static str> = labels
            .iter()
            .filter_map(|l| self.parents.get_key_value(l.as_str()).map(|(&k, _)| k))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        if known.is_empty() {
            return Err(SchemaError::NoKnownType {
                labels: labels.to_vec(),
            });
        }

        let mut most_specific = None;
        for &candidate in &known {
            if known.iter().all(|&other| self.is_ancestor(other, candidate)) {
                if most_specific.is_some() {
                    return Err(SchemaError::AmbiguousLabels {
                        labels: labels.to_vec(),
                    });
                }
                most_specific = Some(candidate);
            }
        }

        most_specific.ok_or_else(|| SchemaError::AmbiguousLabels {
            labels: labels.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_label_chain_runs_root_to_leaf() {
        let hierarchy = TypeHierarchy::core();
        assert_eq!(
            hierarchy.label_chain("PublicCompany").unwrap(),
            vec!["Concept", "Organisation", "Company", "PublicCompany"]
        );
        assert_eq!(hierarchy.label_chain("Concept").unwrap(), vec!["Concept"]);
    }

    #[test]
    fn test_label_chain_unknown_type() {
        let hierarchy = TypeHierarchy::core();
        assert_eq!(
            hierarchy.label_chain("Gadget"),
            Err(SchemaError::UnknownType("Gadget".to_string()))
        );
    }

    #[test]
    fn test_most_specific_resolves_full_chain() {
        let hierarchy = TypeHierarchy::core();
        let resolved = hierarchy
            .most_specific(&labels(&[
                "Thing",
                "Concept",
                "Organisation",
                "Company",
                "PublicCompany",
            ]))
            .unwrap();
        assert_eq!(resolved, "PublicCompany");
    }

    #[test]
    fn test_most_specific_ignores_unknown_labels() {
        let hierarchy = TypeHierarchy::core();
        let resolved = hierarchy
            .most_specific(&labels(&["Thing", "Concept", "Person"]))
            .unwrap();
        assert_eq!(resolved, "Person");
    }

    #[test]
    fn test_most_specific_rejects_forked_label_set() {
        let hierarchy = TypeHierarchy::core();
        let result = hierarchy.most_specific(&labels(&["Concept", "Person", "Brand"]));
        assert!(matches!(result, Err(SchemaError::AmbiguousLabels { .. })));
    }

    #[test]
    fn test_most_specific_rejects_all_unknown() {
        let hierarchy = TypeHierarchy::core();
        let result = hierarchy.most_specific(&labels(&["Thing", "Widget"]));
        assert!(matches!(result, Err(SchemaError::NoKnownType { .. })));
    }
}
