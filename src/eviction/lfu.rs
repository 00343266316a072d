//! LFU Eviction Module
//!
//! Evicts the keys with the fewest hits since they were inserted.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use tracing::trace;

use super::{check_victim_count, EvictionKind, EvictionStrategy};
use crate::error::Result;

/// Rank of a key: hit count first, then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    hits: u64,
    seq: u64,
}

// == LFU Eviction ==
/// Tracks hit counts for LFU eviction.
///
/// Counts start at zero on insertion and only grow on hits; overwriting a
/// tracked key keeps its count. Among keys with equal counts the one
/// inserted earliest is evicted first.
#[derive(Debug)]
pub struct LfuEviction<K> {
    ranks: HashMap<K, Rank>,
    /// Lowest count first
    by_frequency: BTreeMap<Rank, K>,
    seq: u64,
}

impl<K> LfuEviction<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranks: HashMap::with_capacity(capacity),
            by_frequency: BTreeMap::new(),
            seq: 0,
        }
    }

    /// Returns the number of hits recorded for `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.ranks.get(key).map(|rank| rank.hits)
    }
}

impl<K> Default for LfuEviction<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionStrategy<K> for LfuEviction<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn notify_put(&mut self, key: &K) {
        if self.ranks.contains_key(key) {
            return;
        }
        let rank = Rank {
            hits: 0,
            seq: self.seq,
        };
        self.seq += 1;
        self.ranks.insert(key.clone(), rank);
        self.by_frequency.insert(rank, key.clone());
    }

    fn notify_get(&mut self, key: &K) {
        let Some(rank) = self.ranks.get_mut(key) else {
            trace!("lfu: get for untracked key ignored");
            return;
        };
        let current = *rank;
        if let Some(entry) = self.by_frequency.remove(&current) {
            rank.hits = rank.hits.saturating_add(1);
            self.by_frequency.insert(*rank, entry);
        }
    }

    fn notify_remove(&mut self, key: &K) {
        match self.ranks.remove(key) {
            Some(rank) => {
                self.by_frequency.remove(&rank);
            }
            None => trace!("lfu: remove for untracked key ignored"),
        }
    }

    fn notify_clear(&mut self) {
        self.ranks.clear();
        self.by_frequency.clear();
    }

    fn next_victims(&mut self, count: usize) -> Result<Vec<K>> {
        check_victim_count(count, self.ranks.len())?;

        let mut victims = Vec::with_capacity(count);
        while victims.len() < count {
            let Some((_, key)) = self.by_frequency.pop_first() else {
                break;
            };
            self.ranks.remove(&key);
            victims.push(key);
        }
        Ok(victims)
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.ranks.contains_key(key)
    }

    fn kind(&self) -> EvictionKind {
        EvictionKind::Lfu
    }
}
