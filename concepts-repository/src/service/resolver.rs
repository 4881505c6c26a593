//! Write path: concordance resolution.
//!
//! Every id newly appearing in an aggregate is classified by its current
//! equivalence state, every id dropped from it is re-created as a standalone
//! orphan concept, and the resulting statement batch executes as a single
//! transaction. Every branch either emits an event or an error; none drops
//! data silently.
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument, warn};

use concepts_schema::Statement;
use concepts_shared::hash::aggregate_hash;
use concepts_shared::types::{CanonicalAggregate, ConceptChanges, ConceptEvent};

use super::rows::opt_str;
use super::ConceptsService;
use crate::errors::ConceptsRepositoryError;

impl ConceptsService {
    /// Write one aggregate, concording its sources into the canonical node.
    ///
    /// Returns the change events to notify downstream with and the
    /// de-duplicated set of source ids the write touched. Writing an
    /// aggregate whose content hash matches the stored one is a no-op.
    #[instrument(skip_all, fields(pref_uuid = %aggregate.pref_uuid, transaction_id = %transaction_id))]
    pub async fn write(
        &self,
        aggregate: CanonicalAggregate,
        transaction_id: &str,
    ) -> Result<ConceptChanges, ConceptsRepositoryError> {
        let mut aggregate = aggregate;
        self.schema().clean_aggregate(&mut aggregate);
        aggregate.aggregate_hash = aggregate_hash(&aggregate);
        validate_aggregate(self, &aggregate)?;

        let stored = self.read_aggregate(&aggregate.pref_uuid).await?;
        if let Some(stored) = &stored {
            if stored.aggregate_hash == aggregate.aggregate_hash {
                debug!("Aggregate hash unchanged, skipping write");
                return Ok(ConceptChanges::default());
            }
        }

        let new_ids: BTreeSet<String> = aggregate.source_uuids().into_iter().collect();
        let existing_ids: BTreeSet<String> = stored
            .as_ref()
            .map(|s| s.source_uuids().into_iter().collect())
            .unwrap_or_default();
        let transfer: Vec<String> = new_ids.difference(&existing_ids).cloned().collect();
        let unconcord: Vec<String> = existing_ids.difference(&new_ids).cloned().collect();

        let mut events: Vec<ConceptEvent> = Vec::new();
        let mut updated: BTreeSet<String> = BTreeSet::new();
        let mut scheduled_deletes: Vec<String> = Vec::new();

        for id in &transfer {
            self.classify_transfer(
                id,
                &aggregate,
                transaction_id,
                &mut events,
                &mut updated,
                &mut scheduled_deletes,
            )
            .await?;
        }

        let mut orphans: Vec<CanonicalAggregate> = Vec::new();
        for id in &unconcord {
            let prior = stored
                .as_ref()
                .and_then(|s| s.source_representations.iter().find(|src| &src.uuid == id));
            let Some(prior) = prior else {
                warn!(source_uuid = %id, "Unconcorded source has no stored representation, skipping");
                continue;
            };
            let mut orphan = CanonicalAggregate {
                pref_uuid: id.clone(),
                pref_label: prior.pref_label.clone(),
                concept_type: prior.concept_type.clone(),
                properties: BTreeMap::new(),
                aggregate_hash: String::new(),
                source_representations: vec![prior.clone()],
                issued_by: None,
                is_deprecated: prior.is_deprecated,
            };
            orphan.aggregate_hash = aggregate_hash(&orphan);

            events.push(ConceptEvent::concordance_removed(
                &aggregate.concept_type,
                &aggregate.pref_uuid,
                id,
                &aggregate.aggregate_hash,
                transaction_id,
            ));
            updated.insert(id.clone());
            orphans.push(orphan);
        }

        let statements = self
            .assemble_batch(&aggregate, &new_ids, &unconcord, &orphans, &scheduled_deletes)
            .await?;

        events.push(ConceptEvent::updated(
            &aggregate.concept_type,
            &aggregate.pref_uuid,
            &aggregate.aggregate_hash,
            transaction_id,
        ));
        updated.insert(aggregate.pref_uuid.clone());

        let changes = ConceptChanges {
            events,
            updated_ids: updated.into_iter().collect(),
        };

        if let Err(source) = self.store().write_batch(&statements).await {
            return Err(ConceptsRepositoryError::CommitFailed { source, changes });
        }
        info!(
            events = changes.events.len(),
            updated_ids = changes.updated_ids.len(),
            "Wrote aggregate"
        );
        Ok(changes)
    }

    /// Classify one id newly appearing in the aggregate by its current
    /// equivalence state. Conflicts abort the whole write before any
    /// statement executes.
    async fn classify_transfer(
        &self,
        id: &str,
        aggregate: &CanonicalAggregate,
        transaction_id: &str,
        events: &mut Vec<ConceptEvent>,
        updated: &mut BTreeSet<String>,
        scheduled_deletes: &mut Vec<String>,
    ) -> Result<(), ConceptsRepositoryError> {
        let record = self.fetch_equivalence(id).await?;
        updated.insert(id.to_string());

        let record_pref = record.as_ref().and_then(|r| r.pref_uuid.clone());
        let equivalence = record.as_ref().map(|r| r.equivalence).unwrap_or(0);

        let Some(record_pref) = record_pref.filter(|_| equivalence > 0) else {
            // Unknown to the store (or a bare node with no concordance): a
            // plain addition, unless it is the anchor itself.
            if id != aggregate.pref_uuid {
                events.push(ConceptEvent::updated(
                    &aggregate.concept_type,
                    id,
                    &aggregate.aggregate_hash,
                    transaction_id,
                ));
                events.push(ConceptEvent::concordance_added(
                    &aggregate.concept_type,
                    id,
                    &aggregate.pref_uuid,
                    &aggregate.aggregate_hash,
                    transaction_id,
                ));
            }
            return Ok(());
        };

        if equivalence == 1 {
            if id != record_pref {
                // A source that is the sole member of a concordance must
                // itself be the canonical; anything else is corrupt data.
                return Err(ConceptsRepositoryError::conflict(
                    record_pref.clone(),
                    format!(
                        "source {} is the sole member of a concordance anchored at {}",
                        id, record_pref
                    ),
                ));
            }
            // A lone, unconcorded concept being absorbed: safe transfer. Its
            // old canonical node goes away with this write.
            if record_pref != aggregate.pref_uuid {
                scheduled_deletes.push(record_pref);
            }
            events.push(ConceptEvent::concordance_added(
                &aggregate.concept_type,
                id,
                &aggregate.pref_uuid,
                &aggregate.aggregate_hash,
                transaction_id,
            ));
            return Ok(());
        }

        if id == record_pref {
            if id == aggregate.pref_uuid {
                // Re-writing the same concordance's anchor.
                return Ok(());
            }
            let record_authority = record
                .as_ref()
                .and_then(|r| r.authority.clone())
                .unwrap_or_default();
            let anchor_authority = aggregate
                .anchor_source()
                .map(|s| s.authority.clone())
                .unwrap_or_default();
            if record_authority != anchor_authority
                && self.schema().is_overridable_authority(&record_authority)
            {
                // Authority-override transfer: the absorbed concordance's
                // remaining members are assumed present in this aggregate.
                info!(
                    source_uuid = %id,
                    overridden_authority = %record_authority,
                    "Superseding concordance under overridable authority"
                );
                scheduled_deletes.push(record_pref);
                events.push(ConceptEvent::concordance_added(
                    &aggregate.concept_type,
                    id,
                    &aggregate.pref_uuid,
                    &aggregate.aggregate_hash,
                    transaction_id,
                ));
                return Ok(());
            }
            return Err(ConceptsRepositoryError::conflict(
                record_pref,
                format!(
                    "adding {} would break an existing multi-source concordance",
                    id
                ),
            ));
        }

        // The id is concorded elsewhere: the incoming data supersedes the
        // stale membership.
        events.push(ConceptEvent::concordance_removed(
            &aggregate.concept_type,
            &record_pref,
            id,
            &aggregate.aggregate_hash,
            transaction_id,
        ));
        events.push(ConceptEvent::concordance_added(
            &aggregate.concept_type,
            id,
            &aggregate.pref_uuid,
            &aggregate.aggregate_hash,
            transaction_id,
        ));
        Ok(())
    }

    /// Assemble the full statement batch: strip every affected node, write
    /// the new state, recreate orphans, drop absorbed canonical nodes, and
    /// clear any stale issuer claim.
    async fn assemble_batch(
        &self,
        aggregate: &CanonicalAggregate,
        new_ids: &BTreeSet<String>,
        unconcord: &[String],
        orphans: &[CanonicalAggregate],
        scheduled_deletes: &[String],
    ) -> Result<Vec<Statement>, ConceptsRepositoryError> {
        let compiler = self.compiler();
        let mut statements = Vec::new();

        statements.push(compiler.compile_canonical_delete(&aggregate.pref_uuid));
        let mut affected: BTreeSet<&String> = new_ids.iter().collect();
        affected.extend(unconcord.iter());
        for uuid in affected {
            statements.push(compiler.compile_delete(uuid));
        }

        statements.extend(compiler.compile_write(aggregate)?);
        for orphan in orphans {
            statements.extend(compiler.compile_write(orphan)?);
        }
        for pref_uuid in scheduled_deletes {
            statements.push(compiler.compile_canonical_delete(pref_uuid));
        }

        // A single issuer may only ever be claimed by one concordance; a
        // stale claim elsewhere is cleared and logged, not failed.
        if let Some(issuer) = &aggregate.issued_by {
            let check = compiler.compile_issuer_check(issuer, &aggregate.pref_uuid);
            for row in self.store().fetch_rows(&check).await? {
                if let Some(stale) = opt_str(&row, "issuedByPrefUUID") {
                    warn!(
                        issuer_uuid = %issuer,
                        stale_pref_uuid = %stale,
                        "Issuer already claimed by another concordance, clearing stale ISSUED_BY"
                    );
                    statements.push(compiler.compile_issuer_clear(issuer, &stale));
                }
            }
        }
        Ok(statements)
    }
}

fn validate_aggregate(
    service: &ConceptsService,
    aggregate: &CanonicalAggregate,
) -> Result<(), ConceptsRepositoryError> {
    let schema = service.schema();
    if aggregate.pref_label.is_empty() {
        return Err(ConceptsRepositoryError::validation(
            "prefLabel",
            "must be non-empty",
        ));
    }
    if !schema.hierarchy().is_known(&aggregate.concept_type) {
        return Err(ConceptsRepositoryError::validation(
            "type",
            format!("unknown concept type: {}", aggregate.concept_type),
        ));
    }
    if aggregate.source_representations.is_empty() {
        return Err(ConceptsRepositoryError::validation(
            "sourceRepresentations",
            "must be non-empty",
        ));
    }
    for source in &aggregate.source_representations {
        if source.uuid.is_empty() {
            return Err(ConceptsRepositoryError::validation(
                "sourceRepresentations.uuid",
                "must be non-empty",
            ));
        }
        if !schema.hierarchy().is_known(&source.concept_type) {
            return Err(ConceptsRepositoryError::validation(
                "sourceRepresentations.type",
                format!("unknown concept type: {}", source.concept_type),
            ));
        }
        if !schema.is_authority(&source.authority) {
            return Err(ConceptsRepositoryError::validation(
                "sourceRepresentations.authority",
                format!("unknown authority: {}", source.authority),
            ));
        }
        if source.authority_value.is_empty() {
            return Err(ConceptsRepositoryError::validation(
                "sourceRepresentations.authorityValue",
                "must be non-empty",
            ));
        }
    }
    Ok(())
}
