//! Cache Store Module
//!
//! Main cache engine combining concurrent map storage with a pluggable eviction strategy.

use std::hash::Hash;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheCounters, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::eviction::{EvictionKind, EvictionStrategy};

type Strategy<K> = Box<dyn EvictionStrategy<K>>;

// == Cache Store ==
/// Bounded key/value cache with pluggable eviction.
///
/// Lookups go straight to the concurrent map. Every mutation takes the
/// strategy lock for its whole strategy-then-map sequence, so `put`,
/// `put_if_absent`, `remove`, `free` and `clear` are serialized with each
/// other and the strategy always tracks exactly the keys in the map once
/// the lock is released.
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: DashMap<K, V>,
    /// Eviction strategy, also the lock for compound operations
    strategy: Mutex<Strategy<K>>,
    /// Operation counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Entries evicted when a put finds the cache full
    clean_stride: usize,
    eviction: EvictionKind,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync,
{
    // == Constructors ==
    /// Creates a new CacheStore with the given capacity and policy.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the cache can hold
    /// * `eviction` - Policy choosing which entries to evict
    pub fn new(max_size: usize, eviction: EvictionKind) -> Result<Self> {
        Self::from_config(&CacheConfig::new(max_size, eviction))
    }

    /// Creates a new CacheStore from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let strategy = config.eviction.build(config.max_size);
        Self::with_strategy(config.max_size, config.clean_stride, strategy)
    }

    /// Creates a store around a caller-built strategy, e.g. a seeded
    /// [`RandomEviction`](crate::eviction::RandomEviction).
    ///
    /// The strategy must be empty; it becomes owned by this store.
    pub fn with_strategy(
        max_size: usize,
        clean_stride: usize,
        strategy: Strategy<K>,
    ) -> Result<Self> {
        let eviction = strategy.kind();
        CacheConfig::new(max_size, eviction)
            .with_clean_stride(clean_stride)
            .validate()?;
        if !strategy.is_empty() {
            return Err(CacheError::InvalidConfig(
                "strategy must start empty".to_string(),
            ));
        }

        info!(
            "Cache store created: max_size={}, eviction={}, clean_stride={}",
            max_size, eviction, clean_stride
        );

        Ok(Self {
            entries: DashMap::with_capacity(max_size),
            strategy: Mutex::new(strategy),
            counters: CacheCounters::new(),
            max_size,
            clean_stride,
            eviction,
        })
    }

    // == Put ==
    /// Stores a key-value pair, overwriting any previous value.
    ///
    /// When the key is new and the cache already holds `max_size` entries,
    /// up to `clean_stride` entries are evicted first, so the cache never
    /// exceeds its capacity once `put` returns.
    pub fn put(&self, key: K, value: V) -> Result<()> {
        let mut strategy = self.strategy.lock();
        self.insert_locked(&mut **strategy, key, value)
    }

    // == Put If Absent ==
    /// Stores the pair only if the key is not present.
    ///
    /// Returns `true` if the value was inserted. An existing value is left
    /// untouched and nothing is counted.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<bool> {
        let mut strategy = self.strategy.lock();
        if self.entries.contains_key(&key) {
            return Ok(false);
        }
        self.insert_locked(&mut **strategy, key, value)?;
        Ok(true)
    }

    // == Get ==
    /// Retrieves a value by key, counting a hit or miss.
    ///
    /// A hit is reported to the eviction strategy.
    pub fn get(&self, key: &K) -> Option<V> {
        // The map guard is released before the strategy lock is taken
        let value = self.entries.get(key).map(|entry| entry.value().clone());
        self.counters.record_get(value.is_some());
        if value.is_some() {
            self.strategy.lock().notify_get(key);
        }
        value
    }

    // == Get Quiet ==
    /// Retrieves a value without touching counters or eviction ranking.
    pub fn get_quiet(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    // == Contains ==
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut strategy = self.strategy.lock();
        strategy.notify_remove(key);
        self.entries.remove(key).map(|(_, value)| value)
    }

    // == Free ==
    /// Evicts `count` entries chosen by the eviction strategy.
    ///
    /// Returns the number of entries removed. Asking for more entries than
    /// the cache holds fails with [`CacheError::CapacityViolation`] and
    /// evicts nothing.
    pub fn free(&self, count: usize) -> Result<usize> {
        let mut strategy = self.strategy.lock();
        self.evict_locked(&mut **strategy, count)
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        let mut strategy = self.strategy.lock();
        strategy.notify_clear();
        self.entries.clear();
        debug!("Cache cleared");
    }

    // == Views ==
    /// Snapshot of the keys currently cached.
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of the values currently cached.
    pub fn values(&self) -> Vec<V> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    // == Size ==
    /// Returns the current number of entries in the cache.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn eviction_kind(&self) -> EvictionKind {
        self.eviction
    }

    /// Number of keys the eviction strategy tracks; equals `size()` whenever
    /// no mutation is in flight.
    pub fn tracked_len(&self) -> usize {
        self.strategy.lock().len()
    }

    /// Checks if the eviction strategy tracks `key`.
    pub fn is_tracked(&self, key: &K) -> bool {
        self.strategy.lock().contains(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.size(), self.max_size, self.eviction)
    }

    // == Internals ==
    // Both helpers expect the strategy lock to be held by the caller.

    fn insert_locked(
        &self,
        strategy: &mut dyn EvictionStrategy<K>,
        key: K,
        value: V,
    ) -> Result<()> {
        if !self.entries.contains_key(&key) && strategy.len() >= self.max_size {
            let stride = self.clean_stride.min(strategy.len());
            self.evict_locked(strategy, stride)?;
        }

        strategy.notify_put(&key);
        self.entries.insert(key, value);
        self.counters.record_put();
        Ok(())
    }

    fn evict_locked(
        &self,
        strategy: &mut dyn EvictionStrategy<K>,
        count: usize,
    ) -> Result<usize> {
        let tracked = strategy.len();
        if count > tracked {
            return Err(CacheError::CapacityViolation {
                requested: count,
                tracked,
            });
        }

        let victims = strategy.next_victims(count)?;
        let removed = victims
            .iter()
            .filter(|victim| self.entries.remove(*victim).is_some())
            .count();
        self.counters.record_evictions(removed as u64);

        debug!(
            "Evicted {} of {} requested entries ({} policy)",
            removed, count, self.eviction
        );
        Ok(removed)
    }
}

impl<K, V> std::fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("max_size", &self.max_size)
            .field("clean_stride", &self.clean_stride)
            .field("eviction", &self.eviction)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::eviction::RandomEviction;

    fn lru_store(max_size: usize, clean_stride: usize) -> CacheStore<String, String> {
        let config = CacheConfig::new(max_size, EvictionKind::Lru).with_clean_stride(clean_stride);
        CacheStore::from_config(&config).unwrap()
    }

    fn key(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String, String> = CacheStore::new(100, EvictionKind::Lru).unwrap();
        assert_eq!(store.size(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.eviction_kind(), EvictionKind::Lru);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result: Result<CacheStore<String, String>> = CacheStore::new(0, EvictionKind::Fifo);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_store_rejects_non_empty_strategy() {
        let mut strategy = RandomEviction::with_seed(4, 1);
        strategy.notify_put(&key("stale"));

        let result: Result<CacheStore<String, u32>> =
            CacheStore::with_strategy(4, 1, Box::new(strategy));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_store_put_and_get() {
        let store = lru_store(100, 5);

        store.put(key("key1"), key("value1")).unwrap();

        assert_eq!(store.get(&key("key1")), Some(key("value1")));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = lru_store(100, 5);
        assert_eq!(store.get(&key("nonexistent")), None);
    }

    #[test]
    fn test_store_remove() {
        let store = lru_store(100, 5);

        store.put(key("key1"), key("value1")).unwrap();

        assert_eq!(store.remove(&key("key1")), Some(key("value1")));
        assert!(store.is_empty());
        assert_eq!(store.get(&key("key1")), None);
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let store = lru_store(100, 5);
        store.put(key("key1"), key("value1")).unwrap();

        assert_eq!(store.remove(&key("nonexistent")), None);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let store = lru_store(100, 5);

        store.put(key("key1"), key("value1")).unwrap();
        store.put(key("key1"), key("value2")).unwrap();

        assert_eq!(store.get(&key("key1")), Some(key("value2")));
        assert_eq!(store.size(), 1);
        assert_eq!(store.stats().puts, 2);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let store = lru_store(2, 1);

        store.put(key("a"), key("1")).unwrap();
        store.put(key("b"), key("2")).unwrap();
        store.put(key("a"), key("3")).unwrap();

        assert_eq!(store.size(), 2);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let store = lru_store(3, 1);

        store.put(key("key1"), key("value1")).unwrap();
        store.put(key("key2"), key("value2")).unwrap();
        store.put(key("key3"), key("value3")).unwrap();

        // Cache is full, adding key4 should evict key1 (oldest)
        store.put(key("key4"), key("value4")).unwrap();

        assert_eq!(store.size(), 3);
        assert!(!store.contains(&key("key1")));
        assert!(store.contains(&key("key2")));
        assert!(store.contains(&key("key3")));
        assert!(store.contains(&key("key4")));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let store = lru_store(3, 1);

        store.put(key("key1"), key("value1")).unwrap();
        store.put(key("key2"), key("value2")).unwrap();
        store.put(key("key3"), key("value3")).unwrap();

        // Access key1 to make it most recently used
        store.get(&key("key1")).unwrap();

        // Adding key4 should evict key2 (now oldest)
        store.put(key("key4"), key("value4")).unwrap();

        assert!(store.contains(&key("key1")));
        assert!(!store.contains(&key("key2")));
    }

    #[test]
    fn test_store_get_quiet_does_not_touch() {
        let store = lru_store(3, 1);

        store.put(key("key1"), key("value1")).unwrap();
        store.put(key("key2"), key("value2")).unwrap();
        store.put(key("key3"), key("value3")).unwrap();

        assert_eq!(store.get_quiet(&key("key1")), Some(key("value1")));
        assert_eq!(store.get_quiet(&key("missing")), None);
        store.put(key("key4"), key("value4")).unwrap();

        assert!(!store.contains(&key("key1")));
        let stats = store.stats();
        assert_eq!(stats.gets, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_stride_eviction() {
        let store = lru_store(10, 4);

        for i in 0..10 {
            store.put(format!("k{}", i), i.to_string()).unwrap();
        }
        store.put(key("k10"), key("10")).unwrap();

        // Four oldest evicted, then k10 inserted
        assert_eq!(store.size(), 7);
        for i in 0..4 {
            assert!(!store.contains(&format!("k{}", i)));
        }
        assert!(store.contains(&key("k10")));
        assert_eq!(store.stats().evictions, 4);
    }

    #[test]
    fn test_store_stride_capped_at_size() {
        let store = lru_store(2, 10);

        store.put(key("a"), key("1")).unwrap();
        store.put(key("b"), key("2")).unwrap();
        store.put(key("c"), key("3")).unwrap();

        assert_eq!(store.keys(), vec![key("c")]);
    }

    #[test]
    fn test_store_free() {
        let store = lru_store(10, 1);
        for i in 0..5 {
            store.put(format!("k{}", i), i.to_string()).unwrap();
        }

        assert_eq!(store.free(2).unwrap(), 2);

        assert_eq!(store.size(), 3);
        assert!(!store.contains(&key("k0")));
        assert!(!store.contains(&key("k1")));
    }

    #[test]
    fn test_store_free_too_many() {
        let store = lru_store(10, 1);
        store.put(key("a"), key("1")).unwrap();

        assert_eq!(
            store.free(2),
            Err(CacheError::CapacityViolation {
                requested: 2,
                tracked: 1
            })
        );
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_put_if_absent() {
        let store = lru_store(10, 1);

        assert!(store.put_if_absent(key("a"), key("1")).unwrap());
        assert!(!store.put_if_absent(key("a"), key("2")).unwrap());

        assert_eq!(store.get_quiet(&key("a")), Some(key("1")));
        assert_eq!(store.stats().puts, 1);
    }

    #[test]
    fn test_store_clear_keeps_counters() {
        let store = lru_store(10, 1);
        store.put(key("a"), key("1")).unwrap();
        store.get(&key("a"));

        store.clear();

        assert_eq!(store.size(), 0);
        assert_eq!(store.get(&key("a")), None);
        let stats = store.stats();
        assert_eq!(stats.puts, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_keys_and_values() {
        let store = lru_store(10, 1);
        store.put(key("a"), key("1")).unwrap();
        store.put(key("b"), key("2")).unwrap();
        store.remove(&key("a"));

        assert_eq!(store.keys(), vec![key("b")]);
        assert_eq!(store.values(), vec![key("2")]);
    }

    #[test]
    fn test_store_stats() {
        let store = lru_store(100, 5);

        store.put(key("key1"), key("value1")).unwrap();
        store.get(&key("key1")); // hit
        store.get(&key("nonexistent")); // miss

        let stats = store.stats();
        assert_eq!(stats.puts, 1);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.eviction, EvictionKind::Lru);
    }

    #[test]
    fn test_store_with_seeded_random_strategy() {
        let strategy = RandomEviction::<u32>::with_seed(4, 11);
        let store = CacheStore::with_strategy(4, 2, Box::new(strategy)).unwrap();

        for i in 0..5u32 {
            store.put(i, i * 10).unwrap();
        }

        assert_eq!(store.size(), 3);
        assert!(store.contains(&4));
        assert_eq!(store.eviction_kind(), EvictionKind::Random);
    }
}
