//! # gov-migrate - Governance Store Migration Engine
//!
//! Upgrades the persisted governance state of a chain from schema version 1
//! to schema version 2 at an upgrade height. Two procedures do the work:
//!
//! | Procedure | Reads | Writes |
//! |-----------|-------|--------|
//! | [`migrate_proposals`] | every legacy proposal under `0x00` | same keys, current shape |
//! | [`migrate_params`] | legacy deposit and tally aggregates | deposit, tally and custom parameters |
//!
//! Both are plain functions over a [`KvStore`]. [`Upgrader`] wraps them with
//! a schema-version guard and runs them inside one staged transaction.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gov_migrate::{SledStore, Upgrader};
//!
//! let mut store = SledStore::open("./data/state.sled", "gov")?;
//! let report = Upgrader::new("gov", 1, 2).run(&mut store)?;
//! assert!(report.is_success());
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - ordered key-value store trait and its memory, sled and staging implementations
//! - [`codec`] - MessagePack and JSON codecs
//! - [`any`] - type-tagged opaque content envelope
//! - [`keys`] - key layout
//! - [`types`] - current-schema records and parameters
//! - [`legacy`] - legacy records and parameters
//! - [`params`] - parameter namespace with an explicit key table
//! - [`traits`] - transform contract between schema versions
//! - [`migrate`] - the record migrator and the parameter splitter
//! - [`upgrade`] - version-guarded orchestration
//! - [`report`] - upgrade report and verification
//! - [`config`] - upgrade configuration

pub mod any;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod legacy;
pub mod migrate;
pub mod params;
pub mod report;
pub mod store;
pub mod traits;
pub mod types;
pub mod upgrade;

// Re-exports
pub use any::{Any, TypeUrl};
pub use codec::{Codec, JsonCodec, MsgPackCodec};
pub use config::{UpgradeConfig, CURRENT_VERSION};
pub use error::{CodecError, MigrationError, ParamError, StoreError};
pub use migrate::{migrate_params, migrate_proposals, migrate_records};
pub use params::{gov_key_table, KeyTable, ParamSpace, ParamValue, GOV_SPACE};
pub use report::{CountCheck, MigrationCounts, MigrationReport, MigrationVerification};
pub use store::{CacheStore, KvStore, MemStore, SledStore, WriteBatch};
pub use traits::{DepositTransformer, ProposalTransformer, TallySplitter, Transformer};
pub use upgrade::{set_version, stored_version, Upgrader};
