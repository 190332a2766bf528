// ============================================================================
// GUARDED CONTAINERS - Typed collections behind a read/write lock
// ============================================================================
// Every method takes the lock matching its access mode and releases it
// before returning. Values handed out are clones, so nothing outside the
// container can change stored state without going back through a write
// method.

use parking_lot::RwLock;
use std::{borrow::Borrow, collections::HashMap, hash::Hash};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("key already exists")]
    KeyExists,
}

/// Key-value map guarded by a `RwLock`
///
/// `get`/`exists` take the read lock, so lookups run in parallel.
/// `set`/`insert_with` take the write lock.
#[derive(Debug)]
pub struct GuardedMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for GuardedMap<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> GuardedMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value, if any.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Insert the value built by `make` only if `key` is absent.
    ///
    /// The check and the insert happen under one write lock, so two callers
    /// racing on the same key cannot both succeed. `make` runs only when the
    /// key is free.
    pub fn insert_with<F>(&self, key: K, make: F) -> Result<V, StorageError>
    where
        F: FnOnce() -> V,
    {
        let mut map = self.inner.write();
        if map.contains_key(&key) {
            return Err(StorageError::KeyExists);
        }
        let value = make();
        map.insert(key, value.clone());
        Ok(value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Append-only, indexable sequence guarded by a `RwLock`
#[derive(Debug)]
pub struct GuardedList<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> Default for GuardedList<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> GuardedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and return the index the value landed at.
    pub fn add(&self, value: T) -> usize {
        let mut items = self.inner.write();
        items.push(value);
        items.len() - 1
    }

    /// Append a value built from the index it will occupy.
    ///
    /// Runs `make` while holding the write lock, so IDs derived inside it
    /// line up with storage positions even under concurrent appends.
    pub fn push_with<F>(&self, make: F) -> T
    where
        F: FnOnce(usize) -> T,
    {
        let mut items = self.inner.write();
        let value = make(items.len());
        items.push(value.clone());
        value
    }

    /// Snapshot of every element. Later writes do not show up in it.
    pub fn get_all(&self) -> Vec<T> {
        self.inner.read().clone()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.read().get(index).cloned()
    }

    pub fn set(&self, index: usize, value: T) -> Result<(), StorageError> {
        let mut items = self.inner.write();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Read-modify-write of one element under a single write lock.
    pub fn update<F, R>(&self, index: usize, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut items = self.inner.write();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange { index, len })?;
        Ok(f(slot))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
