use std::collections::BTreeMap;

use super::{KvIter, KvStore, WriteBatch};
use crate::error::StoreError;
use crate::keys::prefix_end;

/// In-memory ordered store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every entry, for before/after comparisons
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.entries.clone()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> KvIter<'_> {
        let start = prefix.to_vec();
        let range = match prefix_end(prefix) {
            Some(end) => self.entries.range(start..end),
            None => self.entries.range(start..),
        };
        Box::new(range.map(|(k, v)| Ok((k.clone(), v.clone()))))
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for (key, op) in batch {
            match op {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_prefix_is_bounded_and_ordered() {
        let mut store = MemStore::new();
        store.set(&[0x00, 2], b"b").unwrap();
        store.set(&[0x00, 1], b"a").unwrap();
        store.set(&[0x01, 0], b"other").unwrap();

        let items: Vec<_> = store.iter_prefix(&[0x00]).map(|r| r.unwrap()).collect();
        assert_eq!(
            items,
            vec![(vec![0x00, 1], b"a".to_vec()), (vec![0x00, 2], b"b".to_vec())]
        );
    }

    #[test]
    fn test_apply_batch() {
        let mut store = MemStore::new();
        store.set(b"gone", b"1").unwrap();

        let mut batch = WriteBatch::new();
        batch.delete(b"gone".to_vec());
        batch.set(b"new".to_vec(), b"2".to_vec());
        store.apply_batch(batch).unwrap();

        assert!(!store.has(b"gone").unwrap());
        assert_eq!(store.get(b"new").unwrap(), Some(b"2".to_vec()));
    }
}
