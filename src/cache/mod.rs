//! Cache Module
//!
//! Provides a bounded in-memory cache with pluggable eviction.

mod stats;
mod store;


// Re-export public types
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Default number of entries evicted when a put finds the cache full
pub const CLEAN_STRIDE: usize = 5;
