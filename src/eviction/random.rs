//! Random Eviction Module
//!
//! Chooses victims uniformly at random from the tracked keys.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{check_victim_count, EvictionKind, EvictionStrategy};
use crate::error::{CacheError, Result};

// == Random Eviction ==
/// Tracks keys in a dense array for random eviction.
///
/// `slots` maps each key to its index in `keys`, so removal by value is a
/// swap with the last element. Once cleared, the strategy refuses victim
/// requests until a key is put again.
#[derive(Debug)]
pub struct RandomEviction<K> {
    keys: Vec<K>,
    slots: HashMap<K, usize>,
    rng: StdRng,
    cleared: bool,
}

impl<K> RandomEviction<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a tracker seeded from OS entropy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_rng(capacity, StdRng::from_entropy())
    }

    /// Creates a tracker with a fixed seed, for reproducible victim selection.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::from_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn from_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            rng,
            cleared: false,
        }
    }

    /// Removes the key at `index` by swapping the last key into its place.
    fn take_at(&mut self, index: usize) -> K {
        let key = self.keys.swap_remove(index);
        self.slots.remove(&key);
        if let Some(moved) = self.keys.get(index) {
            self.slots.insert(moved.clone(), index);
        }
        key
    }
}

impl<K> Default for RandomEviction<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionStrategy<K> for RandomEviction<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn notify_put(&mut self, key: &K) {
        self.cleared = false;
        if !self.slots.contains_key(key) {
            self.slots.insert(key.clone(), self.keys.len());
            self.keys.push(key.clone());
        }
    }

    fn notify_get(&mut self, _key: &K) {}

    fn notify_remove(&mut self, key: &K) {
        match self.slots.get(key).copied() {
            Some(index) => {
                self.take_at(index);
            }
            None => trace!("random: remove for untracked key ignored"),
        }
    }

    fn notify_clear(&mut self) {
        self.keys.clear();
        self.slots.clear();
        self.cleared = true;
    }

    /// Floyd's sampling: for each position `j` in `n - count .. n` draw
    /// `t` in `[0, j]` and take `t`, or `j` itself if `t` was already taken.
    /// Every `count`-subset is equally likely and only `count` draws are made.
    fn next_victims(&mut self, count: usize) -> Result<Vec<K>> {
        if self.cleared {
            return Err(CacheError::StrategyCleared { requested: count });
        }
        let n = self.keys.len();
        check_victim_count(count, n)?;

        let mut picked: HashSet<usize> = HashSet::with_capacity(count);
        for j in (n - count)..n {
            let t = self.rng.gen_range(0..=j);
            if !picked.insert(t) {
                picked.insert(j);
            }
        }

        // Highest index first so swap_remove only ever moves unpicked keys
        let mut indices: Vec<usize> = picked.into_iter().collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));

        Ok(indices.into_iter().map(|index| self.take_at(index)).collect())
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    fn kind(&self) -> EvictionKind {
        EvictionKind::Random
    }
}
