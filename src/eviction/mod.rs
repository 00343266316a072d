//! Eviction Module
//!
//! Pluggable policies deciding which keys leave the cache when space is needed.
//!
//! A strategy is a shadow index of store membership: it tracks exactly the keys
//! present in the store and only ranks them. The store notifies it of every
//! put, hit, removal and clear, and asks it for victims when it must shrink.

mod fifo;
mod lfu;
mod lru;
mod random;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

pub use fifo::FifoEviction;
pub use lfu::LfuEviction;
pub use lru::LruEviction;
pub use random::RandomEviction;

// == Eviction Strategy Trait ==
/// Ranking policy consulted by the cache store.
///
/// Notifications for keys the strategy does not track are ignored.
pub trait EvictionStrategy<K>: Send {
    /// Begins tracking `key`, or refreshes it if already tracked.
    fn notify_put(&mut self, key: &K);

    /// Records a cache hit on `key`.
    fn notify_get(&mut self, key: &K);

    /// Stops tracking `key`.
    fn notify_remove(&mut self, key: &K);

    /// Drops all tracking state.
    fn notify_clear(&mut self);

    /// Selects exactly `count` distinct keys to evict and stops tracking them.
    ///
    /// Fails with [`CacheError::CapacityViolation`] when `count` exceeds the
    /// number of tracked keys; nothing is removed in that case.
    fn next_victims(&mut self, count: usize) -> Result<Vec<K>>;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if a key is being tracked.
    fn contains(&self, key: &K) -> bool;

    /// Which policy this is.
    fn kind(&self) -> EvictionKind;
}

/// Rejects a victim request larger than the tracked set.
pub(crate) fn check_victim_count(requested: usize, tracked: usize) -> Result<()> {
    if requested > tracked {
        return Err(CacheError::CapacityViolation { requested, tracked });
    }
    Ok(())
}

// == Eviction Kind ==
/// Selectable eviction policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionKind {
    /// First in, first out
    Fifo,
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
    /// Uniformly random
    Random,
}

impl EvictionKind {
    /// Builds a fresh strategy of this kind for a cache of `capacity` elements.
    pub fn build<K>(self, capacity: usize) -> Box<dyn EvictionStrategy<K>>
    where
        K: Eq + Hash + Clone + Send + 'static,
    {
        match self {
            EvictionKind::Fifo => Box::new(FifoEviction::with_capacity(capacity)),
            EvictionKind::Lru => Box::new(LruEviction::with_capacity(capacity)),
            EvictionKind::Lfu => Box::new(LfuEviction::with_capacity(capacity)),
            EvictionKind::Random => Box::new(RandomEviction::with_capacity(capacity)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionKind::Fifo => "fifo",
            EvictionKind::Lru => "lru",
            EvictionKind::Lfu => "lfu",
            EvictionKind::Random => "random",
        }
    }
}

impl fmt::Display for EvictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(EvictionKind::Fifo),
            "lru" => Ok(EvictionKind::Lru),
            "lfu" => Ok(EvictionKind::Lfu),
            "random" => Ok(EvictionKind::Random),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction strategy '{}'",
                other
            ))),
        }
    }
}
