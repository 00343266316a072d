//! Cache Statistics Module
//!
//! Tracks operation counters and produces serializable snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::eviction::EvictionKind;

// == Cache Counters ==
/// Live operation counters owned by a cache store.
///
/// Counters only grow. Increments are relaxed atomics: exact in
/// single-threaded use, approximate while other threads are mutating.
#[derive(Debug, Default)]
pub struct CacheCounters {
    puts: AtomicU64,
    gets: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup and whether it hit.
    pub fn record_get(&self, hit: bool) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters into a [`CacheStats`].
    pub fn snapshot(&self, entries: usize, max_size: usize, eviction: EvictionKind) -> CacheStats {
        CacheStats {
            puts: self.puts.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries,
            max_size,
            eviction,
            captured_at: Utc::now(),
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of cache performance.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of put operations, overwrites included
    pub puts: u64,
    /// Number of counted lookups
    pub gets: u64,
    /// Lookups that found the key
    pub hits: u64,
    /// Lookups that did not find the key
    pub misses: u64,
    /// Entries removed by eviction
    pub evictions: u64,
    /// Entries present when the snapshot was taken
    pub entries: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Active eviction policy
    pub eviction: EvictionKind,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
