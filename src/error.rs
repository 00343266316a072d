//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache and eviction operations.
///
/// Missing keys are not errors: lookups return `Option::None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Eviction was requested for more elements than are currently tracked
    #[error("{requested} elements can't be evicted, only {tracked} tracked")]
    CapacityViolation { requested: usize, tracked: usize },

    /// Eviction was requested from a strategy that was cleared and has seen no put since
    #[error("{requested} elements can't be evicted from a cleared strategy")]
    StrategyCleared { requested: usize },

    /// Configuration rejected during validation or parsing
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
