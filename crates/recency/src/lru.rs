//! LRU (Least Recently Used) cache implementation
//!
//! A hash index maps each key to its node in a recency list, so lookups,
//! recency bumps and evictions are all O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::{NodeId, RecencyList};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const PREALLOC_LIMIT: usize = 4096;

/// LRU cache with fixed capacity
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, NodeId, S>,
    list: RecencyList<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// Fails with [`Error::InvalidCapacity`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache that hashes keys with `hasher`
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let reserve = capacity.min(PREALLOC_LIMIT);
        debug!(capacity, "creating LRU cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            list: RecencyList::with_capacity(reserve),
            capacity,
        })
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.move_to_back(id);
        self.list.value(id)
    }

    /// Get a mutable value and mark it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.map.get(key)?;
        self.list.move_to_back(id);
        self.list.value_mut(id)
    }

    /// Get a value without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).and_then(|&id| self.list.value(id))
    }

    /// Check for a key without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing key is updated in place. A new key arriving at a full
    /// cache evicts the least recently used entry first.
    pub fn put(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Like [`put`](Self::put), but returns the entry evicted to make room
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.map.get(&key) {
            if let Some(slot) = self.list.value_mut(id) {
                *slot = value;
            }
            self.list.move_to_back(id);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            let entry = self.pop_lru();
            trace!(capacity = self.capacity, "evicted least recently used entry");
            entry
        } else {
            None
        };

        let id = self.list.push_back(key.clone(), value);
        self.map.insert(key, id);

        evicted
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|(_, value)| value)
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_front()?;
        self.map.remove(&key);
        Some((key, value))
    }

    /// Least recently used entry, without touching recency
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.front().and_then(|id| self.list.entry(id))
    }

    /// Change the capacity, evicting least recently used entries as needed
    ///
    /// Returns the number of entries evicted. A zero capacity is rejected and
    /// leaves the cache unchanged.
    pub fn resize(&mut self, capacity: usize) -> Result<usize> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let mut evicted = 0;
        while self.map.len() > capacity && self.pop_lru().is_some() {
            evicted += 1;
        }

        debug!(from = self.capacity, to = capacity, evicted, "resized LRU cache");
        self.capacity = capacity;

        Ok(evicted)
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        debug!(capacity = self.capacity, "cleared LRU cache");
    }

    /// Entries from least to most recently used
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.list.iter()
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    /// Check the index/list bijection and the capacity bound; panics on
    /// violation.
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();

        assert_eq!(self.map.len(), self.list.len(), "index and list sizes differ");
        assert!(self.map.len() <= self.capacity, "size exceeds capacity");
        for (key, &id) in &self.map {
            assert!(
                self.list.key(id) == Some(key),
                "index entry points at a node with a different key"
            );
        }
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("entries", &DebugEntries(&self.list))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a RecencyList<K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
