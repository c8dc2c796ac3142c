//! Write-staging overlay
//!
//! A [`CacheStore`] reads through to its parent and keeps every write in a
//! [`WriteBatch`]. Nothing reaches the parent until [`CacheStore::write`],
//! which hands the whole batch to the parent's atomic `apply_batch`.
//! Dropping the cache (or calling [`CacheStore::discard`]) throws the staged
//! writes away.

use std::cmp::Ordering;
use std::iter::Peekable;

use tracing::debug;

use super::{KvIter, KvPair, KvStore, WriteBatch};
use crate::error::StoreError;

pub struct CacheStore<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    writes: WriteBatch,
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            writes: WriteBatch::new(),
        }
    }

    /// Number of staged operations
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Commit staged writes to the parent in one batch
    pub fn write(self) -> Result<usize, StoreError> {
        let count = self.writes.len();
        self.parent.apply_batch(self.writes)?;
        debug!(operations = count, "Committed staged writes");
        Ok(count)
    }

    /// Drop staged writes without touching the parent
    pub fn discard(self) -> usize {
        let count = self.writes.len();
        debug!(operations = count, "Discarded staged writes");
        count
    }
}

impl<'a, S: KvStore + ?Sized> KvStore for CacheStore<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.lookup(key) {
            Some(staged) => Ok(staged.map(<[u8]>::to_vec)),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.writes.set(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.delete(key);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> KvIter<'_> {
        Box::new(Overlay {
            parent: self.parent.iter_prefix(prefix).peekable(),
            staged: (Box::new(self.writes.range_prefix(prefix)) as StagedIter<'_>).peekable(),
        })
    }

    fn apply_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        self.writes.merge(batch);
        Ok(())
    }
}

type StagedIter<'a> = Box<dyn Iterator<Item = (&'a Vec<u8>, &'a Option<Vec<u8>>)> + 'a>;

/// Ascending merge of parent entries and staged operations
///
/// A staged operation shadows the parent entry with the same key; staged
/// deletions are skipped.
struct Overlay<'a> {
    parent: Peekable<KvIter<'a>>,
    staged: Peekable<StagedIter<'a>>,
}

enum Source {
    Parent,
    Staged,
    Shadowed,
}

impl<'a> Iterator for Overlay<'a> {
    type Item = Result<KvPair, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let source = match (self.parent.peek(), self.staged.peek()) {
                (None, None) => return None,
                (Some(Err(_)), _) | (Some(Ok(_)), None) => Source::Parent,
                (None, Some(_)) => Source::Staged,
                (Some(Ok((parent_key, _))), Some((staged_key, _))) => {
                    match parent_key.cmp(*staged_key) {
                        Ordering::Less => Source::Parent,
                        Ordering::Equal => Source::Shadowed,
                        Ordering::Greater => Source::Staged,
                    }
                }
            };

            match source {
                Source::Parent => return self.parent.next(),
                Source::Shadowed => {
                    self.parent.next();
                }
                Source::Staged => {}
            }
            if let Some((key, Some(value))) = self.staged.next() {
                return Some(Ok((key.clone(), value.clone())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn test_cache_reads_through_and_overlays() {
        let mut parent = MemStore::new();
        parent.set(b"k/1", b"old").unwrap();
        parent.set(b"k/2", b"keep").unwrap();

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"k/1", b"new").unwrap();
        cache.set(b"k/3", b"added").unwrap();
        cache.delete(b"k/2").unwrap();

        assert_eq!(cache.get(b"k/1").unwrap(), Some(b"new".to_vec()));
        assert_eq!(cache.get(b"k/2").unwrap(), None);

        let items: Vec<_> = cache.iter_prefix(b"k/").map(|r| r.unwrap()).collect();
        assert_eq!(
            items,
            vec![
                (b"k/1".to_vec(), b"new".to_vec()),
                (b"k/3".to_vec(), b"added".to_vec()),
            ]
        );
    }

    #[test]
    fn test_overlay_iteration_interleaves_in_key_order() {
        let mut parent = MemStore::new();
        for key in [b"p/1", b"p/3", b"p/5", b"q/0"] {
            parent.set(key, b"parent").unwrap();
        }

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"p/0", b"staged").unwrap();
        cache.set(b"p/3", b"staged").unwrap();
        cache.delete(b"p/5").unwrap();
        cache.delete(b"p/9").unwrap();
        cache.set(b"p/7", b"staged").unwrap();

        let mut iter = cache.iter_prefix(b"p/");
        assert_eq!(iter.next().unwrap().unwrap(), (b"p/0".to_vec(), b"staged".to_vec()));
        let rest: Vec<_> = iter.map(|r| r.unwrap()).collect();
        assert_eq!(
            rest,
            vec![
                (b"p/1".to_vec(), b"parent".to_vec()),
                (b"p/3".to_vec(), b"staged".to_vec()),
                (b"p/7".to_vec(), b"staged".to_vec()),
            ]
        );
    }

    #[test]
    fn test_discard_leaves_parent_untouched() {
        let mut parent = MemStore::new();
        parent.set(b"a", b"1").unwrap();
        let before = parent.snapshot();

        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"a", b"2").unwrap();
        assert_eq!(cache.discard(), 1);

        assert_eq!(parent.snapshot(), before);
    }

    #[test]
    fn test_write_commits_everything() {
        let mut parent = MemStore::new();
        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"a", b"1").unwrap();
        cache.set(b"b", b"2").unwrap();
        assert_eq!(cache.write().unwrap(), 2);

        assert_eq!(parent.len(), 2);
    }
}
