//! LRU Eviction Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::Instant;

use tracing::trace;

use super::{check_victim_count, EvictionKind, EvictionStrategy};
use crate::error::Result;

/// Position of a key in the recency index.
///
/// Ordered by last-touch time; the sequence number breaks ties between
/// touches that read the same clock value, so earlier touches sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Touch {
    at: Instant,
    seq: u64,
}

// == LRU Eviction ==
/// Tracks last access time for LRU eviction.
///
/// `touched` maps each key to its last touch, and `by_recency` indexes the
/// same touches in ascending order, so updates and victim selection are
/// O(log n) per key instead of a rescan of the whole set.
#[derive(Debug)]
pub struct LruEviction<K> {
    /// Last touch per key
    touched: HashMap<K, Touch>,
    /// Oldest touch first
    by_recency: BTreeMap<Touch, K>,
    /// Next tie-break sequence number
    seq: u64,
}

impl<K> LruEviction<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            touched: HashMap::with_capacity(capacity),
            by_recency: BTreeMap::new(),
            seq: 0,
        }
    }

    // == Touch ==
    /// Marks a key as used now, tracking it if it was new.
    fn touch(&mut self, key: &K) {
        let touch = Touch {
            at: Instant::now(),
            seq: self.seq,
        };
        self.seq += 1;

        if let Some(previous) = self.touched.insert(key.clone(), touch) {
            self.by_recency.remove(&previous);
        }
        self.by_recency.insert(touch, key.clone());
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.by_recency.values().next()
    }
}

impl<K> Default for LruEviction<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionStrategy<K> for LruEviction<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn notify_put(&mut self, key: &K) {
        self.touch(key);
    }

    fn notify_get(&mut self, key: &K) {
        // A hit racing with a removal can arrive after the key is gone
        if self.touched.contains_key(key) {
            self.touch(key);
        } else {
            trace!("lru: get for untracked key ignored");
        }
    }

    fn notify_remove(&mut self, key: &K) {
        match self.touched.remove(key) {
            Some(touch) => {
                self.by_recency.remove(&touch);
            }
            None => trace!("lru: remove for untracked key ignored"),
        }
    }

    fn notify_clear(&mut self) {
        self.touched.clear();
        self.by_recency.clear();
    }

    fn next_victims(&mut self, count: usize) -> Result<Vec<K>> {
        check_victim_count(count, self.touched.len())?;

        let mut victims = Vec::with_capacity(count);
        while victims.len() < count {
            let Some((_, key)) = self.by_recency.pop_first() else {
                break;
            };
            self.touched.remove(&key);
            victims.push(key);
        }
        Ok(victims)
    }

    fn len(&self) -> usize {
        self.touched.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.touched.contains_key(key)
    }

    fn kind(&self) -> EvictionKind {
        EvictionKind::Lru
    }
}
