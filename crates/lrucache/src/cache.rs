//! SharedCache: thread-safe handle over an LRU cache

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::lru::{Insert, LruCache};
use crate::stats::CacheStats;

/// LRU cache shared between threads
///
/// A single mutex guards the index and the recency list together for the
/// whole of each operation. Every operation is O(1), so the lock is held
/// briefly. Cloning the handle shares the same cache.
pub struct SharedCache<K, V> {
    /// Index and recency list behind one lock
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,

    /// Whether reads and writes update `stats`
    record_stats: bool,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            record_stats: self.record_stats,
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new SharedCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Result<SharedCache>` - `Error::ZeroCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(&CacheConfig::new(capacity))
    }

    /// Create a new SharedCache from a config
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        let cache = LruCache::with_config(config)?;

        Ok(Self {
            cache: Arc::new(Mutex::new(cache)),
            stats: Arc::new(CacheStats::new()),
            record_stats: config.record_stats,
        })
    }

    /// Insert or update a value
    ///
    /// # Returns
    /// * `bool` - `true` if the key was already cached
    pub fn set(&self, key: K, value: V) -> bool {
        let mut cache = self.cache.lock();
        let outcome = cache.insert(key, value);

        // Stats change under the same lock as the entries they count
        if self.record_stats {
            match &outcome {
                Insert::Updated => self.stats.record_update(),
                Insert::Inserted => self.stats.record_insert(),
                Insert::Evicted(..) => {
                    self.stats.record_insert();
                    self.stats.record_eviction();
                }
            }
        }

        drop(cache);
        outcome.was_present()
    }

    /// Get a value, marking it most recently used
    ///
    /// # Returns
    /// * `Option<V>` - Clone of the cached value, `None` on a miss
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut cache = self.cache.lock();
        let value = cache.get(key).cloned();

        if self.record_stats {
            if value.is_some() {
                self.stats.record_hit();
            } else {
                self.stats.record_miss();
            }
        }
        drop(cache);

        value
    }

    /// Get a value without touching its recency or the statistics
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.cache.lock().peek(key).cloned()
    }

    /// Check whether a key is cached
    pub fn contains(&self, key: &K) -> bool {
        self.cache.lock().contains(key)
    }

    /// Remove a value from the cache
    pub fn remove(&self, key: &K) -> Option<V> {
        self.cache.lock().remove(key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Clear the cache and reset its statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.clear();
        self.stats.reset();
    }

    /// Run `f` with the cache locked
    ///
    /// Lets a caller combine several operations atomically.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V>) -> R) -> R {
        let mut guard = self.cache.lock();
        f(&mut *guard)
    }
}
