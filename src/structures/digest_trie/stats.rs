//! Read-only statistics snapshot

use serde::{Deserialize, Serialize};

/// Point-in-time projection of the cache's accounting counters.
///
/// Every counter is maintained exactly under all mutation paths, so the
/// snapshot doubles as the source of truth for the byte budget:
/// [`CacheStats::total_bytes`] is the quantity compared against
/// `max_bytes` during eviction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Bytes held by interior index nodes.
    pub index_size: u64,
    /// Header and length-field bytes across all payload records.
    pub meta_size: u64,
    /// Key plus value bytes across all payload records.
    pub data_size: u64,
    /// Live payload records.
    pub num_keys: u64,
    /// Interior index nodes, derived from `index_size`.
    pub num_indexes: u64,
    /// Lifetime count of LRU-triggered removals; survives `clear`.
    pub num_evictions: u64,
}

impl CacheStats {
    /// Total tracked footprint: index, metadata, and data bytes.
    pub fn total_bytes(&self) -> u64 {
        self.index_size + self.meta_size + self.data_size
    }
}
