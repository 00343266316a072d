//! Boundcache - A bounded in-process key/value cache
//!
//! Holds at most a fixed number of entries and evicts with a pluggable
//! FIFO, LRU, LFU or random policy when full.

pub mod cache;
pub mod config;
pub mod error;
pub mod eviction;

pub use cache::{CacheStats, CacheStore, CLEAN_STRIDE};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use eviction::{EvictionKind, EvictionStrategy};
