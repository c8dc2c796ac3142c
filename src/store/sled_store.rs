//! sled-backed store
//!
//! One sled tree holds one module's keys. Batches go through
//! `sled::Tree::apply_batch`, which is atomic.

use std::path::Path;

use sled::{Db, Tree};
use tracing::info;

use super::{KvIter, KvStore, WriteBatch};
use crate::error::StoreError;

pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    /// Open or create the database at `path` and select `tree_name`
    pub fn open<P: AsRef<Path>>(path: P, tree_name: &str) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        let tree = db.open_tree(tree_name)?;
        info!(path = %path.as_ref().display(), tree = tree_name, "Opened state database");
        Ok(Self { db, tree })
    }

    /// Temporary database removed on drop
    pub fn temporary(tree_name: &str) -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(tree_name)?;
        Ok(Self { db, tree })
    }

    /// Block until all writes are durable
    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.db.flush()?)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl KvStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> KvIter<'_> {
        Box::new(self.tree.scan_prefix(prefix).map(|item| {
            item.map(|(k, v)| (k.to_vec(), v.to_vec()))
                .map_err(StoreError::from)
        }))
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut sled_batch = sled::Batch::default();
        for (key, op) in batch {
            match op {
                Some(value) => sled_batch.insert(key, value),
                None => sled_batch.remove(key),
            }
        }
        self.tree.apply_batch(sled_batch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sled_prefix_scan_and_batch() {
        let mut store = SledStore::temporary("gov").unwrap();
        store.set(&[0x00, 0, 2], b"two").unwrap();
        store.set(&[0x00, 0, 1], b"one").unwrap();
        store.set(b"params/gov/x", b"{}").unwrap();

        let keys: Vec<Vec<u8>> = store
            .iter_prefix(&[0x00])
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![vec![0x00, 0, 1], vec![0x00, 0, 2]]);

        let mut batch = WriteBatch::new();
        batch.set(vec![0x00, 0, 1], b"uno".to_vec());
        batch.delete(b"params/gov/x".to_vec());
        store.apply_batch(batch).unwrap();

        assert_eq!(store.get(&[0x00, 0, 1]).unwrap(), Some(b"uno".to_vec()));
        assert_eq!(store.get(b"params/gov/x").unwrap(), None);
        assert_eq!(store.len(), 2);
    }
}
