//! Configuration Module
//!
//! Construction-time settings for a cache store, loadable from environment variables.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::CLEAN_STRIDE;
use crate::error::{CacheError, Result};
use crate::eviction::EvictionKind;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Policy choosing which entries to evict
    pub eviction: EvictionKind,
    /// Number of entries evicted at once when the cache is full
    pub clean_stride: usize,
}

impl CacheConfig {
    /// Creates a config with the given capacity and policy and the default stride.
    pub fn new(max_size: usize, eviction: EvictionKind) -> Self {
        Self {
            max_size,
            eviction,
            clean_stride: CLEAN_STRIDE,
        }
    }

    pub fn with_clean_stride(mut self, clean_stride: usize) -> Self {
        self.clean_stride = clean_stride;
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BOUNDCACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `BOUNDCACHE_EVICTION` - `fifo`, `lru`, `lfu` or `random` (default: lru)
    /// - `BOUNDCACHE_CLEAN_STRIDE` - Entries evicted per full put (default: 5)
    ///
    /// Values that fail to parse are logged and replaced by their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env_or("BOUNDCACHE_MAX_SIZE", defaults.max_size),
            eviction: env_or("BOUNDCACHE_EVICTION", defaults.eviction),
            clean_stride: env_or("BOUNDCACHE_CLEAN_STRIDE", defaults.clean_stride),
        }
    }

    /// Rejects a zero capacity or zero stride.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }
        if self.clean_stride == 0 {
            return Err(CacheError::InvalidConfig(
                "clean_stride must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(1000, EvictionKind::default())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
