//! Content hash over a cleaned canonical aggregate.
//!
//! The hash is a SHA-256 digest of the aggregate's canonical JSON form with
//! the hash field itself blanked, so the stored hash never feeds back into
//! the comparison. Map keys serialize in sorted order and the caller is
//! expected to have normalized source and relationship ordering, which makes
//! the digest stable across processes.
use sha2::{Digest, Sha256};

use crate::types::CanonicalAggregate;

/// Compute the content hash of an aggregate.
pub fn aggregate_hash(aggregate: &CanonicalAggregate) -> String {
    let mut unhashed = aggregate.clone();
    unhashed.aggregate_hash = String::new();

    // Plain structs with string/int leaves cannot fail to serialize.
    let payload = serde_json::to_vec(&unhashed).expect("aggregate serializes to JSON");

    let mut hasher = Sha256::new();
    hasher.update(&payload);
    hex::encode(hasher.finalize())
}
