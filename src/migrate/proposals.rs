//! Record migrator
//!
//! Walks every record under a key prefix in ascending key order, decodes it
//! with the legacy shape, transforms it, and re-encodes it with the current
//! shape under the same key. All writes are staged in one [`WriteBatch`]
//! and applied only after the whole prefix has been processed, so a record
//! that fails to decode leaves the store exactly as it was.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::codec::Codec;
use crate::error::MigrationError;
use crate::keys::{describe_key, PROPOSALS_PREFIX};
use crate::legacy;
use crate::report::MigrationCounts;
use crate::store::{KvStore, WriteBatch};
use crate::traits::{ProposalTransformer, Transformer};
use crate::types::Proposal;

/// Re-encode every record under `prefix` from `Old` to `New`
///
/// Stops at the first record that cannot be decoded or encoded and returns
/// an error naming its key. The key set under `prefix` never changes.
pub fn migrate_records<S, C, Old, New, T>(
    store: &mut S,
    prefix: &[u8],
    codec: &C,
    transformer: &T,
) -> Result<MigrationCounts, MigrationError>
where
    S: KvStore + ?Sized,
    C: Codec,
    Old: DeserializeOwned,
    New: Serialize,
    T: Transformer<Old, New>,
{
    let record_type = transformer.record_type().to_string();
    info!(
        record_type = %record_type,
        prefix = %hex::encode(prefix),
        codec = codec.name(),
        "Migrating records"
    );

    let mut batch = WriteBatch::new();
    let mut counts = MigrationCounts::default();

    for item in store.iter_prefix(prefix) {
        let (key, value) = item?;
        counts.exported += 1;

        let old: Old = codec
            .decode(&value)
            .map_err(|source| MigrationError::decode(&key, source))?;
        let new = transformer.transform(old);
        counts.transformed += 1;

        let bytes = codec
            .encode(&new)
            .map_err(|source| MigrationError::encode(&key, source))?;
        debug!(key = %describe_key(&key), bytes = bytes.len(), "Staged record");
        batch.set(key, bytes);
    }

    store.apply_batch(batch)?;
    counts.imported = counts.transformed;

    info!(record_type = %record_type, records = counts.imported, "Records migrated");
    Ok(counts)
}

/// Migrate every stored proposal to the current schema
///
/// Content envelopes are carried over untouched: the migrator never
/// resolves their type URL.
pub fn migrate_proposals<S, C>(store: &mut S, codec: &C) -> Result<MigrationCounts, MigrationError>
where
    S: KvStore + ?Sized,
    C: Codec,
{
    migrate_records::<S, C, legacy::Proposal, Proposal, _>(
        store,
        PROPOSALS_PREFIX,
        codec,
        &ProposalTransformer,
    )
}
