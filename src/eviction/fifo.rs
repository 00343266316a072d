//! FIFO Eviction Module
//!
//! Evicts keys in the order they were first inserted.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use tracing::trace;

use super::{check_victim_count, EvictionKind, EvictionStrategy};
use crate::error::Result;

// == FIFO Eviction ==
/// Tracks insertion order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next victim)
/// - Back = Newest insertion
///
/// Reads never reorder keys, and overwriting a tracked key keeps its
/// original position.
#[derive(Debug)]
pub struct FifoEviction<K> {
    /// Keys in insertion order
    queue: VecDeque<K>,
    /// Membership index for the queue
    members: HashSet<K>,
}

impl<K> FifoEviction<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a tracker pre-sized for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Returns the next key to be evicted without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.queue.front()
    }
}

impl<K> Default for FifoEviction<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionStrategy<K> for FifoEviction<K>
where
    K: Eq + Hash + Clone + Send,
{
    fn notify_put(&mut self, key: &K) {
        if self.members.insert(key.clone()) {
            self.queue.push_back(key.clone());
        }
    }

    fn notify_get(&mut self, _key: &K) {}

    fn notify_remove(&mut self, key: &K) {
        if self.members.remove(key) {
            self.queue.retain(|k| k != key);
        } else {
            trace!("fifo: remove for untracked key ignored");
        }
    }

    fn notify_clear(&mut self) {
        self.queue.clear();
        self.members.clear();
    }

    fn next_victims(&mut self, count: usize) -> Result<Vec<K>> {
        check_victim_count(count, self.queue.len())?;

        let victims: Vec<K> = self.queue.drain(..count).collect();
        for victim in &victims {
            self.members.remove(victim);
        }
        Ok(victims)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    fn kind(&self) -> EvictionKind {
        EvictionKind::Fifo
    }
}
