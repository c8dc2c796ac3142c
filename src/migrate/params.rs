//! Parameter splitter
//!
//! Fixed three-step rewrite of the governance parameter namespace:
//!
//! 1. legacy deposit parameters -> deposit parameters (initial-deposit floor dropped)
//! 2. legacy tally aggregate -> tally parameters (default triple only)
//! 3. legacy tally aggregate -> custom parameters (both certifier-update triples)
//!
//! The legacy values are read raw, since the namespace is expected to carry
//! the current key table already. Each legacy key is read once. Values are
//! carried over without re-validation, and the key table is checked for all
//! three keys before the first write. Writes done by an earlier step stay in
//! place if a later read fails; run this inside a
//! [`crate::store::CacheStore`] when the three writes must land together.

use serde::de::DeserializeOwned;
use tracing::info;

use crate::codec::{Codec, JsonCodec};
use crate::error::MigrationError;
use crate::keys::{self, PARAM_KEY_CUSTOM, PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY};
use crate::legacy;
use crate::params::ParamSpace;
use crate::store::KvStore;
use crate::traits::{DepositTransformer, TallySplitter, Transformer};
use crate::types::{CustomParams, DepositParams, TallyParams};

/// Split the legacy deposit and tally aggregates of `space`
///
/// `space` must already carry the current key table. Fails with
/// [`MigrationError::MissingParam`] or [`MigrationError::Decode`] when a
/// legacy value is absent or does not have the legacy shape, and with
/// [`MigrationError::Param`] when the key table does not accept the new
/// values; the latter is detected before anything is written.
pub fn migrate_params<S: KvStore>(space: &mut ParamSpace<S>) -> Result<(), MigrationError> {
    info!(space = space.name(), "Migrating parameters");

    space.check_type::<DepositParams>(PARAM_KEY_DEPOSIT)?;
    space.check_type::<TallyParams>(PARAM_KEY_TALLY)?;
    space.check_type::<CustomParams>(PARAM_KEY_CUSTOM)?;

    let old_deposit: legacy::DepositParams = read_legacy(space, PARAM_KEY_DEPOSIT)?;
    let deposit = DepositTransformer.transform(old_deposit);
    space.set_unchecked(PARAM_KEY_DEPOSIT, &deposit)?;

    let old_tally: legacy::TallyParams = read_legacy(space, PARAM_KEY_TALLY)?;
    let (tally, custom) = TallySplitter.transform(old_tally);
    space.set_unchecked(PARAM_KEY_TALLY, &tally)?;
    space.set_unchecked(PARAM_KEY_CUSTOM, &custom)?;

    info!(
        space = space.name(),
        min_deposit = %deposit.min_deposit,
        quorum = %tally.quorum,
        threshold = %tally.threshold,
        "Parameters migrated"
    );
    Ok(())
}

fn read_legacy<S: KvStore, T: DeserializeOwned>(
    space: &ParamSpace<S>,
    key: &str,
) -> Result<T, MigrationError> {
    let full_key = keys::param_key(space.name(), key);
    let bytes = space.get_raw(key)?.ok_or_else(|| MigrationError::MissingParam {
        key: keys::describe_key(&full_key),
    })?;
    JsonCodec
        .decode(&bytes)
        .map_err(|source| MigrationError::decode(&full_key, source))
}
