//! SharedCache: thread-safe LRU cache handle
//!
//! One `RwLock` guards the whole [`LruCache`], so the lookup index and the
//! recency list are always updated together. Lookups bump recency and
//! therefore take the write guard; only `peek`, `contains` and the size
//! accessors get by with a read guard.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Cloneable, thread-safe LRU cache with hit/miss statistics
pub struct SharedCache<K, V> {
    /// LRU cache, index and list behind one lock
    cache: Arc<RwLock<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> From<LruCache<K, V>> for SharedCache<K, V> {
    fn from(cache: LruCache<K, V>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            stats: Arc::new(CacheStats::new()),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Result<SharedCache>` - Fails if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from(LruCache::new(capacity)?))
    }

    /// Get a value and mark it most recently used
    ///
    /// # Returns
    /// * `Some(value)` on a hit, `None` if the key is absent
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.cache.write();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value without touching recency or statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.read().peek(key).cloned()
    }

    /// Check for a key without touching recency or statistics
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.read().contains(key)
    }

    /// Insert or update a value, evicting the least recently used entry
    /// when a new key arrives at a full cache
    pub fn put(&self, key: K, value: V) {
        let mut cache = self.cache.write();

        if cache.contains(&key) {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }

        if cache.push(key, value).is_some() {
            self.stats.record_eviction();
        }
    }

    /// Remove a key
    ///
    /// # Returns
    /// * The removed value, or `None` if the key was absent
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.cache.write().remove(key);
        if removed.is_some() {
            self.stats.record_removal();
        }
        removed
    }

    /// Change capacity, evicting least recently used entries as needed
    ///
    /// # Returns
    /// * `Result<usize>` - Number of entries evicted
    pub fn resize(&self, capacity: usize) -> Result<usize> {
        let evicted = self.cache.write().resize(capacity)?;
        self.stats.record_evictions(evicted as u64);
        Ok(evicted)
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> Vec<K> {
        self.cache.read().keys().cloned().collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.read().capacity()
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        let mut cache = self.cache.write();
        cache.clear();
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_cache_basic() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(1u64, b"test data".to_vec());
        let data = cache.get(&1).unwrap();

        assert_eq!(data, b"test data");
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_cache_zero_capacity() {
        let result = SharedCache::<u64, u64>::new(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_cache_miss() {
        let cache: SharedCache<u64, u64> = SharedCache::new(10).unwrap();

        assert_eq!(cache.get(&42), None);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hit_ratio(), 0.0);
    }

    #[test]
    fn test_cache_eviction() {
        let cache = SharedCache::new(2).unwrap();

        cache.put(0u64, "data 0");
        cache.put(1, "data 1");
        assert_eq!(cache.len(), 2);

        cache.put(2, "data 2");

        // 0 was least recently used
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 1);
        assert_eq!(cache.get(&1), Some("data 1"));
        assert_eq!(cache.get(&2), Some("data 2"));
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.stats().hits(), 2);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_cache_update_counts() {
        let cache = SharedCache::new(2).unwrap();

        cache.put("k", 1);
        cache.put("k", 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek("k"), Some(2));
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.stats().updates(), 1);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_cache_peek_keeps_order() {
        let cache = SharedCache::new(2).unwrap();

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.peek("a"), Some(1));
        assert!(cache.contains("a"));

        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_cache_delete() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(7u64, "test data");
        assert_eq!(cache.remove(&7), Some("test data"));
        assert_eq!(cache.remove(&7), None);

        assert_eq!(cache.get(&7), None);
        assert_eq!(cache.stats().removals(), 1);
    }

    #[test]
    fn test_cache_resize() {
        let cache = SharedCache::new(4).unwrap();

        for key in 0u32..4 {
            cache.put(key, key);
        }

        assert_eq!(cache.resize(1).unwrap(), 3);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.keys(), vec![3]);
        assert_eq!(cache.stats().evictions(), 3);
        assert!(cache.resize(0).is_err());
    }

    #[test]
    fn test_cache_clear() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(0u32, "data 0");
        cache.put(1, "data 1");
        cache.get(&0);

        assert_eq!(cache.len(), 2);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits(), 0);
        assert_eq!(cache.stats().inserts(), 0);
    }

    #[test]
    fn test_cache_clone_shares_state() {
        let cache = SharedCache::new(4).unwrap();
        let other = cache.clone();

        cache.put("a", 1);

        assert_eq!(other.get("a"), Some(1));
        assert_eq!(cache.stats().hits(), 1);
    }
}
