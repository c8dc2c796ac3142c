//! Ordered key-value store abstraction
//!
//! The migration engine only needs four things from the chain's store:
//! point reads, point writes, ascending iteration over a key prefix, and an
//! atomic batch apply. [`KvStore`] captures exactly that.
//!
//! ## Implementations
//!
//! | Store | Backing | Used for |
//! |-------|---------|----------|
//! | [`MemStore`] | `BTreeMap` | tests, scratch state |
//! | [`SledStore`] | `sled::Tree` | on-disk node state |
//! | [`CacheStore`] | overlay over any store | staging an upgrade before commit |

mod cache;
mod memory;
mod sled_store;

pub use cache::CacheStore;
pub use memory::MemStore;
pub use sled_store::SledStore;

use std::collections::BTreeMap;

use crate::error::StoreError;

/// A key and its stored value
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Lazy ascending iteration over a key range
pub type KvIter<'a> = Box<dyn Iterator<Item = Result<KvPair, StoreError>> + 'a>;

pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// Every entry whose key starts with `prefix`, in ascending key order
    fn iter_prefix(&self, prefix: &[u8]) -> KvIter<'_>;

    /// Apply all operations of `batch` at once
    ///
    /// Either every operation lands or none does.
    fn apply_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> KvIter<'_> {
        (**self).iter_prefix(prefix)
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).apply_batch(batch)
    }
}

/// Staged writes, keyed and ordered like the store itself
///
/// `None` marks a deletion. A later operation on the same key replaces the
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.ops.insert(key.into(), Some(value.into()));
    }

    pub fn delete(&mut self, key: impl Into<Vec<u8>>) {
        self.ops.insert(key.into(), None);
    }

    /// Staged state of `key`: `Some(None)` if deleted, `None` if untouched
    pub fn lookup(&self, key: &[u8]) -> Option<Option<&[u8]>> {
        self.ops.get(key).map(|op| op.as_deref())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Staged operations whose key starts with `prefix`
    pub fn range_prefix(
        &self,
        prefix: &[u8],
    ) -> impl Iterator<Item = (&Vec<u8>, &Option<Vec<u8>>)> + '_ {
        let prefix = prefix.to_vec();
        self.ops
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
    }

    /// Fold another batch into this one; its operations win on conflict
    pub fn merge(&mut self, other: WriteBatch) {
        self.ops.extend(other.ops);
    }
}

impl IntoIterator for WriteBatch {
    type Item = (Vec<u8>, Option<Vec<u8>>);
    type IntoIter = std::collections::btree_map::IntoIter<Vec<u8>, Option<Vec<u8>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
