//! Parameter namespace
//!
//! A [`ParamSpace`] is a named region of the store holding module
//! configuration values, one JSON value per parameter key. Which keys it
//! accepts, and with which value types, is decided by its active
//! [`KeyTable`]. During an upgrade the caller swaps the table explicitly with
//! [`ParamSpace::set_key_table`]: legacy values are written under the legacy
//! table, read back raw, and rewritten under the current table.

use std::any::type_name;
use std::collections::BTreeMap;

use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::error::{ParamError, StoreError};
use crate::keys::{self, PARAM_KEY_CUSTOM, PARAM_KEY_DEPOSIT, PARAM_KEY_TALLY, PARAM_KEY_VOTING};
use crate::store::KvStore;
use crate::types::{CustomParams, DepositParams, TallyParams, VotingParams};

/// Name of the governance parameter namespace
pub const GOV_SPACE: &str = "gov";

/// A value that can live in a parameter namespace
pub trait ParamValue: serde::Serialize + serde::de::DeserializeOwned + 'static {
    /// Reject values the module must never run with
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl ParamValue for DepositParams {
    fn validate(&self) -> Result<(), String> {
        DepositParams::validate(self)
    }
}

impl ParamValue for VotingParams {
    fn validate(&self) -> Result<(), String> {
        VotingParams::validate(self)
    }
}

impl ParamValue for TallyParams {
    fn validate(&self) -> Result<(), String> {
        TallyParams::validate(self)
    }
}

impl ParamValue for CustomParams {
    fn validate(&self) -> Result<(), String> {
        CustomParams::validate(self)
    }
}

/// Registered parameter keys and the value type each one holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    entries: BTreeMap<String, &'static str>,
}

impl KeyTable {
    /// Empty table; every key is rejected until registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` as holding values of type `T`
    pub fn register<T: ParamValue>(mut self, key: &str) -> Self {
        self.entries.insert(key.to_string(), type_name::<T>());
        self
    }

    /// Type name registered for `key`
    pub fn type_of(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Key table of the current governance schema
pub fn gov_key_table() -> KeyTable {
    KeyTable::new()
        .register::<DepositParams>(PARAM_KEY_DEPOSIT)
        .register::<VotingParams>(PARAM_KEY_VOTING)
        .register::<TallyParams>(PARAM_KEY_TALLY)
        .register::<CustomParams>(PARAM_KEY_CUSTOM)
}

/// Typed view of one parameter namespace inside a store
pub struct ParamSpace<S: KvStore> {
    store: S,
    name: String,
    table: KeyTable,
}

impl<S: KvStore> ParamSpace<S> {
    /// View namespace `name` of `store` through `table`
    pub fn new(store: S, name: &str, table: KeyTable) -> Self {
        Self {
            store,
            name: name.to_string(),
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_table(&self) -> &KeyTable {
        &self.table
    }

    /// Replace the active key table, returning the previous one
    pub fn set_key_table(&mut self, table: KeyTable) -> KeyTable {
        debug!(space = %self.name, keys = ?table.keys().collect::<Vec<_>>(), "Swapping parameter key table");
        std::mem::replace(&mut self.table, table)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn has(&self, key: &str) -> Result<bool, StoreError> {
        self.store.has(&keys::param_key(&self.name, key))
    }

    /// Stored bytes for `key`, bypassing the key table
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(&keys::param_key(&self.name, key))
    }

    /// Decode the value under `key`; [`ParamError::NotFound`] if unset
    pub fn get<T: ParamValue>(&self, key: &str) -> Result<T, ParamError> {
        self.get_if_exists(key)?
            .ok_or_else(|| ParamError::NotFound { key: key.to_string() })
    }

    /// Decode the value under `key`, if any
    ///
    /// The key table must map `key` to `T`. Values are not re-validated on
    /// read.
    pub fn get_if_exists<T: ParamValue>(&self, key: &str) -> Result<Option<T>, ParamError> {
        self.check_type::<T>(key)?;
        match self.get_raw(key)? {
            Some(bytes) => JsonCodec
                .decode(&bytes)
                .map(Some)
                .map_err(|source| ParamError::Codec {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Validate and store `value` under `key`
    pub fn set<T: ParamValue>(&mut self, key: &str, value: &T) -> Result<(), ParamError> {
        self.check_type::<T>(key)?;
        value.validate().map_err(|reason| ParamError::Invalid {
            key: key.to_string(),
            reason,
        })?;
        self.write(key, value)
    }

    /// Store `value` under `key` with only the key table check
    ///
    /// Used when rewriting values that already live in the store: whatever
    /// an older binary accepted is carried over as is.
    pub fn set_unchecked<T: ParamValue>(&mut self, key: &str, value: &T) -> Result<(), ParamError> {
        self.check_type::<T>(key)?;
        self.write(key, value)
    }

    /// Fail unless the active key table maps `key` to `T`
    pub fn check_type<T: ParamValue>(&self, key: &str) -> Result<(), ParamError> {
        let expected = self.table.type_of(key).ok_or_else(|| ParamError::UnregisteredKey {
            space: self.name.clone(),
            key: key.to_string(),
        })?;
        let found = type_name::<T>();
        if expected != found {
            return Err(ParamError::TypeMismatch {
                key: key.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn write<T: ParamValue>(&mut self, key: &str, value: &T) -> Result<(), ParamError> {
        let bytes = JsonCodec.encode(value).map_err(|source| ParamError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.store.set(&keys::param_key(&self.name, key), &bytes)?;
        debug!(space = %self.name, key, "Set parameter");
        Ok(())
    }
}
