//! Configuration for the cache engine
//!
//! This module handles the construction parameters of a cache instance:
//! the optional size budgets that drive eviction and the tuning constants
//! of the adaptive trie.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_BUCKETS, DEFAULT_REINDEX_SCATTER};

/// Construction parameters for a cache instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Upper bound on live keys; 0 disables the bound.
    pub max_keys: u64,

    /// Upper bound on the total tracked footprint (index + metadata + data
    /// bytes); 0 disables the bound.
    pub max_bytes: u64,

    /// Bucket-list length at which a slot splits into a nested index.
    pub max_buckets: u8,

    /// Per-symbol stagger added to the split threshold; 0 disables
    /// staggering so every slot splits at exactly `max_buckets`.
    pub reindex_scatter: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_keys: 0,
            max_bytes: 0,
            max_buckets: DEFAULT_MAX_BUCKETS,
            reindex_scatter: DEFAULT_REINDEX_SCATTER,
        }
    }
}

impl CacheConfig {
    /// Config with the given budgets and default trie tuning.
    pub fn bounded(max_keys: u64, max_bytes: u64) -> Self {
        Self {
            max_keys,
            max_bytes,
            ..Self::default()
        }
    }
}
