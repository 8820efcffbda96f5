//! LRU (Least Recently Used) cache implementation
//!
//! A hash index maps each key to a handle into an ordered list kept
//! most-recently-used first. The list owns the entries; the index only
//! holds handles.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;
use lrulist::{List, NodeId};
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::Result;

/// Upper bound on storage reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 4096;

/// Payload stored in each list node
///
/// The key is kept next to the value so eviction can drop the index entry.
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Outcome of [`LruCache::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert<K, V> {
    /// Key was present; its value was overwritten in place
    Updated,
    /// Key was new and fit without eviction
    Inserted,
    /// Key was new and the least recently used entry was evicted
    Evicted(K, V),
}

impl<K, V> Insert<K, V> {
    /// Whether the key was already cached before the call
    pub fn was_present(&self) -> bool {
        matches!(self, Insert::Updated)
    }
}

/// LRU cache with fixed capacity
///
/// Not synchronized; see [`SharedCache`](crate::SharedCache) for use across
/// threads.
pub struct LruCache<K, V> {
    map: HashMap<K, NodeId, RandomState>,
    list: List<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::ZeroCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(&CacheConfig::new(capacity))
    }

    /// Create a new LRU cache from a config
    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        debug!(capacity = config.capacity, "creating LRU cache");
        let reserve = config.capacity.min(PREALLOC_LIMIT);

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            list: List::with_capacity(reserve),
            capacity: config.capacity,
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.map.get(key)?;
        self.list.get(*id).map(|entry| &entry.value)
    }

    /// Check whether a key is cached, without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or update a key-value pair
    ///
    /// # Returns
    /// * `bool` - `true` if the key was already cached
    pub fn set(&mut self, key: K, value: V) -> bool {
        self.insert(key, value).was_present()
    }

    /// Insert or update a key-value pair, reporting any eviction
    ///
    /// Updating an existing key never evicts. Inserting a new key evicts at
    /// most one entry, the current tail.
    pub fn insert(&mut self, key: K, value: V) -> Insert<K, V> {
        if let Some(&id) = self.map.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            self.list.move_to_front(id);
            return Insert::Updated;
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, id);

        if self.list.len() > self.capacity {
            if let Some((key, value)) = self.evict() {
                return Insert::Evicted(key, value);
            }
        }
        Insert::Inserted
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Least recently used entry, the next eviction candidate
    pub fn lru(&self) -> Option<(&K, &V)> {
        self.list.back_value().map(|entry| (&entry.key, &entry.value))
    }

    /// Iterate entries from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
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

    /// Drop every entry; capacity is unchanged
    pub fn clear(&mut self) {
        trace!(entries = self.map.len(), "clearing LRU cache");
        self.map.clear();
        self.list.clear();
    }

    /// Assert that the index and the list agree
    #[doc(hidden)]
    pub fn check_invariants(&self) {
        self.list.check_invariants();
        assert_eq!(self.map.len(), self.list.len(), "index size vs list length");
        assert!(self.list.len() <= self.capacity, "over capacity");
        for (key, id) in &self.map {
            let entry = self.list.get(*id).expect("index points at a live node");
            assert!(entry.key == *key, "index key differs from entry key");
        }
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.map.remove(&entry.key);
        debug!(len = self.list.len(), "evicted least recently used entry");
        Some((entry.key, entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn cache<V>(capacity: usize) -> LruCache<&'static str, V> {
        LruCache::new(capacity).unwrap()
    }

    #[test]
    fn test_lru_zero_capacity() {
        let result = LruCache::<u32, u32>::new(0);
        assert!(matches!(result, Err(Error::ZeroCapacity)));
    }

    #[test]
    fn test_lru_huge_capacity() {
        let mut cache = LruCache::new(usize::MAX).unwrap();
        assert_eq!(cache.capacity(), usize::MAX);

        for i in 0..10_000u64 {
            assert!(!cache.set(i, i));
        }
        assert!(cache.set(0, 42));

        assert_eq!(cache.len(), 10_000);
        assert_eq!(cache.get(&0), Some(&42));
        assert_eq!(cache.lru(), Some((&1, &1)));
        assert_eq!(cache.remove(&1), Some(1));
        cache.check_invariants();
    }

    #[test]
    fn test_lru_large_capacity_evicts() {
        let config = CacheConfig::new(PREALLOC_LIMIT + 2);
        let mut cache = LruCache::with_config(&config).unwrap();

        for i in 0..(PREALLOC_LIMIT + 3) {
            cache.set(i, i);
        }

        assert_eq!(cache.len(), PREALLOC_LIMIT + 2);
        assert!(!cache.contains(&0));
        assert!(cache.contains(&1));
        cache.check_invariants();
    }

    #[test]
    fn test_lru_empty_miss() {
        let mut cache = cache::<i32>(10);

        assert_eq!(cache.get(&"aaa"), None);
        assert_eq!(cache.get(&"bbb"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = cache(5);

        assert!(!cache.set("aaa", 100));
        assert!(!cache.set("bbb", 200));

        assert_eq!(cache.get(&"aaa"), Some(&100));
        assert_eq!(cache.get(&"bbb"), Some(&200));

        assert!(cache.set("aaa", 300));
        assert_eq!(cache.get(&"aaa"), Some(&300));
        assert_eq!(cache.get(&"ccc"), None);
        cache.check_invariants();
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = cache(2);

        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3); // Should evict a

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        cache.check_invariants();
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut cache = cache(3);

        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        assert_eq!(cache.get(&"a"), Some(&1)); // Move a to front
        cache.set("d", 4); // Should evict b

        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"d"), Some(&4));
        cache.check_invariants();
    }

    #[test]
    fn test_lru_update_refreshes_recency() {
        let mut cache = cache(2);

        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.set("a", 10)); // Move a to front
        cache.set("c", 3); // Should evict b

        assert!(!cache.contains(&"b"));
        assert_eq!(cache.peek(&"a"), Some(&10));
    }

    #[test]
    fn test_lru_overwrite_does_not_evict() {
        let mut cache = cache(1);

        assert!(!cache.set("a", 1));
        assert_eq!(cache.insert("a", 2), Insert::Updated);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a"), Some(&2));
    }

    #[test]
    fn test_lru_insert_reports_eviction() {
        let mut cache = cache(2);

        assert_eq!(cache.insert("a", 1), Insert::Inserted);
        assert_eq!(cache.insert("b", 2), Insert::Inserted);
        assert_eq!(cache.insert("c", 3), Insert::Evicted("a", 1));
        assert!(!cache.insert("d", 4).was_present());
    }

    #[test]
    fn test_lru_capacity_invariant() {
        let mut cache = LruCache::new(4).unwrap();

        for i in 0..20u32 {
            cache.set(i % 7, i);
            let distinct = (i as usize + 1).min(7);
            assert_eq!(cache.len(), distinct.min(4));
            cache.check_invariants();
        }
    }

    #[test]
    fn test_lru_evicts_first_of_c_plus_one() {
        let mut cache = LruCache::new(5).unwrap();

        for i in 0..6u32 {
            cache.set(i, i * 10);
        }

        assert_eq!(cache.get(&0), None);
        for i in 1..6u32 {
            assert_eq!(cache.get(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn test_lru_peek_keeps_order() {
        let mut cache = cache(2);

        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.peek(&"a"), Some(&1));
        cache.set("c", 3); // Peek did not refresh a

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = cache(3);

        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert_eq!(cache.remove(&"b"), Some(2));
        assert_eq!(cache.remove(&"b"), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"b"), None);
        cache.check_invariants();
    }

    #[test]
    fn test_lru_iter_and_lru() {
        let mut cache = cache(3);

        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        cache.get(&"a");

        let order: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(cache.lru(), Some((&"b", &2)));
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = cache(3);

        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.capacity(), 3);

        // Refill to capacity without eviction
        assert_eq!(cache.insert("x", 1), Insert::Inserted);
        assert_eq!(cache.insert("y", 2), Insert::Inserted);
        assert_eq!(cache.insert("z", 3), Insert::Inserted);
        assert_eq!(cache.len(), 3);
        cache.check_invariants();
    }
}
