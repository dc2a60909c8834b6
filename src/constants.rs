//! Global constants used throughout the cache engine
//!
//! This module contains compile-time constants that are shared across
//! multiple modules to ensure consistency and avoid magic numbers.

/// Number of routing symbols produced by the key digest
///
/// Sixteen 4-bit symbols consume exactly the 64 bits of the mixed key
/// hash, so every level of the trie routes on fresh hash bits.
pub const DIGEST_LEN: usize = 16;

/// Trie fanout: child slots per index node
///
/// Also the alphabet size of digest symbols. Must stay a power of two so
/// symbols can be peeled off the hash with shifts and masks.
pub const FANOUT: usize = 16;

/// Default bucket-list length at which a slot splits into a nested index
///
/// Eight records per list with a scatter of sixteen is about the right
/// balance of scan cost and index memory.
pub const DEFAULT_MAX_BUCKETS: u8 = 8;

/// Default per-symbol stagger added to the split threshold
///
/// Sibling slots split at slightly different list lengths so skewed
/// workloads do not trigger a burst of simultaneous reindexes.
pub const DEFAULT_REINDEX_SCATTER: u8 = 16;

/// Widest storable key
///
/// Key lengths are recorded in a 2-byte field inside the payload record.
pub const MAX_KEY_LEN: usize = u16::MAX as usize;

/// Widest storable value
///
/// Value lengths are recorded in a 4-byte field inside the payload record.
pub const MAX_VALUE_LEN: usize = u32::MAX as usize;
