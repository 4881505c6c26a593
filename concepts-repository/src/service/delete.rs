//! Delete path: referential safety checks ahead of concept deletion.
use std::collections::BTreeSet;

use tracing::{info, instrument};

use super::rows::opt_str;
use super::ConceptsService;
use crate::errors::ConceptsRepositoryError;

impl ConceptsService {
    /// Delete a canonical concept, all its source nodes and the edges they
    /// exclusively own. Fails if the uuid is not the canonical anchor or if
    /// other concepts hold relationships into it.
    #[instrument(skip(self), fields(transaction_id = %transaction_id))]
    pub async fn delete(
        &self,
        uuid: &str,
        transaction_id: &str,
    ) -> Result<Vec<String>, ConceptsRepositoryError> {
        Self::validate_uuid("uuid", uuid)?;

        let record = self.fetch_equivalence(uuid).await?;
        let canonical = record.and_then(|r| r.pref_uuid).ok_or_else(|| {
            ConceptsRepositoryError::NotFound {
                uuid: uuid.to_string(),
            }
        })?;
        if canonical != uuid {
            return Err(ConceptsRepositoryError::DeleteSource {
                uuid: uuid.to_string(),
                canonical,
            });
        }

        let aggregate = self.read_aggregate(uuid).await?.ok_or_else(|| {
            ConceptsRepositoryError::NotFound {
                uuid: uuid.to_string(),
            }
        })?;

        let compiler = self.compiler();
        let check = compiler.compile_reference_check(uuid);
        let referencers: Vec<String> = self
            .store()
            .fetch_rows(&check)
            .await?
            .iter()
            .filter_map(|row| opt_str(row, "referencerUUID"))
            .collect();
        if !referencers.is_empty() {
            return Err(ConceptsRepositoryError::DeleteRelated {
                uuid: uuid.to_string(),
                referencers,
            });
        }

        self.store()
            .write_batch(&[compiler.compile_concordance_delete(uuid)])
            .await?;

        let mut affected: BTreeSet<String> = aggregate.source_uuids().into_iter().collect();
        affected.insert(uuid.to_string());
        let affected: Vec<String> = affected.into_iter().collect();
        info!(deleted = affected.len(), "Deleted concept");
        Ok(affected)
    }
}
