//! Schema-driven Cypher generation.
//!
//! Every compile method is a pure function of the schema (and the aggregate,
//! for writes). Clause fragments derived from the relationship table are
//! emitted in lexicographic label order so the rendered text is identical
//! across runs for a fixed schema.
mod delete;
mod read;
mod write;

use concepts_shared::types::CanonicalAggregate;

use crate::errors::SchemaError;
use crate::registry::Schema;
use crate::statement::Statement;

pub struct QueryCompiler<'a> {
    schema: &'a Schema,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// The read program: one row per source of the canonical node, with
    /// relationship targets collected per the schema's projection rules.
    pub fn compile_read(&self, pref_uuid: &str) -> Statement {
        read::compile_read(self.schema, pref_uuid)
    }

    /// The equivalence lookup used to classify transfer outcomes: which
    /// canonical a source id points to, and how many members that
    /// concordance has.
    pub fn compile_equivalence(&self, uuid: &str) -> Statement {
        read::compile_equivalence(uuid)
    }

    /// The write batch for one aggregate: canonical upsert, source upserts,
    /// `EQUIVALENT_TO` and relationship edges.
    pub fn compile_write(
        &self,
        aggregate: &CanonicalAggregate,
    ) -> Result<Vec<Statement>, SchemaError> {
        write::compile_write(self.schema, aggregate)
    }

    /// The strip program: remove every schema-declared relationship and
    /// label from the node with this source uuid, leaving a bare node.
    pub fn compile_delete(&self, uuid: &str) -> Statement {
        delete::compile_delete(self.schema, uuid)
    }

    /// Delete one canonical node (used when a lone concordance is absorbed).
    pub fn compile_canonical_delete(&self, pref_uuid: &str) -> Statement {
        delete::compile_canonical_delete(pref_uuid)
    }

    /// Delete a canonical node together with all of its sources.
    pub fn compile_concordance_delete(&self, pref_uuid: &str) -> Statement {
        delete::compile_concordance_delete(pref_uuid)
    }

    /// Find nodes outside a concordance holding relationships into it.
    pub fn compile_reference_check(&self, pref_uuid: &str) -> Statement {
        delete::compile_reference_check(pref_uuid)
    }

    /// Find any other canonical currently claiming `ISSUED_BY` to an issuer.
    pub fn compile_issuer_check(&self, issuer_uuid: &str, pref_uuid: &str) -> Statement {
        write::compile_issuer_check(issuer_uuid, pref_uuid)
    }

    /// Remove a stale `ISSUED_BY` claim from another concordance.
    pub fn compile_issuer_clear(&self, issuer_uuid: &str, stale_pref_uuid: &str) -> Statement {
        write::compile_issuer_clear(issuer_uuid, stale_pref_uuid)
    }
}

/// Cypher variable name for a relationship label: `HAS_BROADER` becomes
/// `hasBroader`.
pub(crate) fn clause_var(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for (i, part) in label.split('_').enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            out.push_str(&part.to_lowercase());
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
            }
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}
