//! Version-guarded upgrade orchestration
//!
//! [`Upgrader::run`] is what an upgrade handler calls at the upgrade height.
//! It:
//!
//! 1. reads the module's stored schema version (absent means the source version)
//! 2. skips if the store is already at the target version
//! 3. stages both procedures in one [`CacheStore`] over the caller's store
//! 4. swaps the parameter namespace to the current key table
//! 5. verifies the staged state (record counts, every record decodes, all
//!    parameter keys present)
//! 6. bumps the version and commits everything in one batch
//!
//! Any failure before step 6 leaves the caller's store untouched.

use tracing::{info, warn};

use crate::codec::{Codec, MsgPackCodec};
use crate::config::{check_versions, UpgradeConfig};
use crate::error::{CodecError, MigrationError};
use crate::keys::{self, PARAM_KEY_CUSTOM, PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY, PROPOSALS_PREFIX};
use crate::legacy::legacy_key_table;
use crate::migrate::{migrate_params, migrate_proposals};
use crate::params::{gov_key_table, ParamSpace};
use crate::report::{MigrationCounts, MigrationReport};
use crate::store::{CacheStore, KvStore};
use crate::types::{CustomParams, DepositParams, Proposal, TallyParams};

/// Schema version recorded for `module`, if any
pub fn stored_version<S: KvStore + ?Sized>(
    store: &S,
    module: &str,
) -> Result<Option<u64>, MigrationError> {
    let key = keys::version_key(module);
    match store.get(&key)? {
        Some(bytes) => {
            let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                MigrationError::decode(
                    &key,
                    CodecError::Invalid(format!("version must be 8 bytes, got {}", bytes.len())),
                )
            })?;
            Ok(Some(u64::from_be_bytes(raw)))
        }
        None => Ok(None),
    }
}

/// Record `version` as the schema version of `module`
pub fn set_version<S: KvStore + ?Sized>(
    store: &mut S,
    module: &str,
    version: u64,
) -> Result<(), MigrationError> {
    store.set(&keys::version_key(module), &version.to_be_bytes())?;
    Ok(())
}

/// Runs the governance store upgrade for one module
///
/// Built with [`Upgrader::new`] or [`Upgrader::from_config`]; only the
/// legacy-to-current version pair is accepted when it runs.
pub struct Upgrader<C: Codec = MsgPackCodec> {
    /// Module name, also the parameter namespace
    module: String,
    /// Version the store must be at
    from_version: u64,
    /// Version recorded after a committed upgrade
    to_version: u64,
    /// Stage and verify, then discard
    dry_run: bool,
    /// Codec of the proposal records
    codec: C,
}

impl Upgrader<MsgPackCodec> {
    /// Upgrader for `module` using MessagePack proposal records
    pub fn new(module: &str, from_version: u64, to_version: u64) -> Self {
        Self {
            module: module.to_string(),
            from_version,
            to_version,
            dry_run: false,
            codec: MsgPackCodec,
        }
    }

    /// Upgrader described by a validated [`UpgradeConfig`]
    pub fn from_config(config: &UpgradeConfig) -> Result<Self, MigrationError> {
        config.validate()?;
        Ok(Self::new(&config.module, config.from_version, config.to_version)
            .dry_run(config.dry_run))
    }
}

impl<C: Codec> Upgrader<C> {
    /// Use another codec for proposal records
    pub fn with_codec<D: Codec>(self, codec: D) -> Upgrader<D> {
        Upgrader {
            module: self.module,
            from_version: self.from_version,
            to_version: self.to_version,
            dry_run: self.dry_run,
            codec,
        }
    }

    /// Discard the staged upgrade instead of committing it
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Upgrade `store` in one staged transaction
    ///
    /// Returns a skipped report when the store is already at the target
    /// version. On any error, including a failed verification, nothing is
    /// written to `store`.
    pub fn run<S: KvStore + ?Sized>(&self, store: &mut S) -> Result<MigrationReport, MigrationError> {
        check_versions(self.from_version, self.to_version)?;
        let mut report = MigrationReport::new(&self.module, self.from_version, self.to_version);
        report.dry_run = self.dry_run;

        let found = stored_version(store, &self.module)?.unwrap_or(self.from_version);
        if found == self.to_version {
            warn!(module = %self.module, version = found, "Store already at target version, skipping upgrade");
            report.skipped = true;
            report
                .verification
                .add_note(format!("already at version {}", found));
            report.complete();
            return Ok(report);
        }
        if found != self.from_version {
            return Err(MigrationError::VersionMismatch {
                module: self.module.clone(),
                expected: self.from_version,
                found,
            });
        }

        info!(
            module = %self.module,
            from = self.from_version,
            to = self.to_version,
            dry_run = self.dry_run,
            "Starting upgrade"
        );

        let proposals_before = count_prefix(store, PROPOSALS_PREFIX)?;
        let mut cache = CacheStore::new(store);

        let counts = migrate_proposals(&mut cache, &self.codec)?;
        report.record_counts("Proposal", counts);

        let mut space = ParamSpace::new(&mut cache, &self.module, legacy_key_table());
        space.set_key_table(gov_key_table());
        migrate_params(&mut space)?;
        report.record_counts("DepositParams", single_counts(1));
        report.record_counts("TallyParams", single_counts(2));
        verify_params(&space, &mut report)?;

        let proposals_after = verify_proposals(&cache, &self.codec)?;
        report
            .verification
            .add_count_check("Proposal", proposals_before, proposals_after);

        if !report.is_success() {
            let pending = cache.discard();
            report
                .verification
                .add_note(format!("discarded {} staged writes", pending));
            return Err(MigrationError::Verification(report.verification.notes.join("; ")));
        }

        set_version(&mut cache, &self.module, self.to_version)?;

        if self.dry_run {
            let pending = cache.discard();
            report
                .verification
                .add_note(format!("dry run: {} staged writes discarded", pending));
        } else {
            let written = cache.write()?;
            info!(module = %self.module, operations = written, "Upgrade committed");
        }

        report.complete();
        Ok(report)
    }
}

fn single_counts(imported: u64) -> MigrationCounts {
    MigrationCounts {
        exported: 1,
        transformed: 1,
        imported,
    }
}

fn count_prefix<S: KvStore + ?Sized>(store: &S, prefix: &[u8]) -> Result<u64, MigrationError> {
    let mut count = 0;
    for item in store.iter_prefix(prefix) {
        item?;
        count += 1;
    }
    Ok(count)
}

/// Every staged proposal decodes under the current schema and sits under
/// the key of its own id
fn verify_proposals<S: KvStore + ?Sized, C: Codec>(
    store: &S,
    codec: &C,
) -> Result<u64, MigrationError> {
    let mut count = 0;
    for item in store.iter_prefix(PROPOSALS_PREFIX) {
        let (key, value) = item?;
        let proposal: Proposal = codec
            .decode(&value)
            .map_err(|source| MigrationError::decode(&key, source))?;
        let key_id = keys::proposal_id_from_key(&key)?;
        if key_id != proposal.proposal_id {
            return Err(MigrationError::Verification(format!(
                "proposal {} stored under key of proposal {}",
                proposal.proposal_id, key_id
            )));
        }
        count += 1;
    }
    Ok(count)
}

fn verify_params<S: KvStore>(
    space: &ParamSpace<S>,
    report: &mut MigrationReport,
) -> Result<(), MigrationError> {
    if space.get_if_exists::<DepositParams>(PARAM_KEY_DEPOSIT)?.is_none() {
        report.verification.fail(format!("{} missing after upgrade", PARAM_KEY_DEPOSIT));
    }
    if space.get_if_exists::<TallyParams>(PARAM_KEY_TALLY)?.is_none() {
        report.verification.fail(format!("{} missing after upgrade", PARAM_KEY_TALLY));
    }
    if space.get_if_exists::<CustomParams>(PARAM_KEY_CUSTOM)?.is_none() {
        report.verification.fail(format!("{} missing after upgrade", PARAM_KEY_CUSTOM));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn test_version_roundtrip() {
        let mut store = MemStore::new();
        assert_eq!(stored_version(&store, "gov").unwrap(), None);
        set_version(&mut store, "gov", 2).unwrap();
        assert_eq!(stored_version(&store, "gov").unwrap(), Some(2));
        assert_eq!(stored_version(&store, "shield").unwrap(), None);
    }

    #[test]
    fn test_malformed_version_is_decode_error() {
        let mut store = MemStore::new();
        store.set(&keys::version_key("gov"), &[1, 2, 3]).unwrap();
        assert!(matches!(
            stored_version(&store, "gov"),
            Err(MigrationError::Decode { .. })
        ));
    }

    #[test]
    fn test_already_at_target_is_skipped() {
        let mut store = MemStore::new();
        set_version(&mut store, "gov", 2).unwrap();
        let before = store.snapshot();

        let report = Upgrader::new("gov", 1, 2).run(&mut store).unwrap();
        assert!(report.skipped);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_unexpected_version_rejected() {
        let mut store = MemStore::new();
        set_version(&mut store, "gov", 5).unwrap();

        let err = Upgrader::new("gov", 1, 2).run(&mut store).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::VersionMismatch { expected: 1, found: 5, .. }
        ));
    }

    #[test]
    fn test_unsupported_version_pair_rejected() {
        let mut store = MemStore::new();
        set_version(&mut store, "gov", 3).unwrap();
        let before = store.snapshot();

        let err = Upgrader::new("gov", 3, 4).run(&mut store).unwrap_err();
        assert!(matches!(err, MigrationError::Config(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_missing_params_abort_without_writes() {
        let mut store = MemStore::new();
        let err = Upgrader::new("gov", 1, 2).run(&mut store).unwrap_err();
        assert!(matches!(err, MigrationError::MissingParam { .. }));
        assert!(store.is_empty());
    }
}
