//! # nibblecache
//!
//! In-memory byte-keyed cache engine. Keys and values are arbitrary byte
//! sequences; lookups are routed through a digest-keyed adaptive trie and
//! every live record is threaded onto an intrusive doubly-linked recency
//! list, giving O(1) LRU promotion, recency-ordered key traversal, and
//! bounded-size eviction by key count or byte budget.
//!
//! ```
//! use nibblecache::{NibbleCache, StoreOutcome};
//!
//! let mut cache = NibbleCache::new();
//! assert_eq!(cache.store(b"alpha", b"1", 0), Ok(StoreOutcome::Added));
//! assert_eq!(cache.store(b"alpha", b"2", 0), Ok(StoreOutcome::Replaced));
//! assert_eq!(cache.fetch(b"alpha").map(|e| e.value.to_vec()), Some(b"2".to_vec()));
//! assert_eq!(cache.first_key(), Some(&b"alpha"[..]));
//! ```

#![warn(missing_docs)]

/// Core support: configuration, errors, logging.
pub mod core;

/// System constants
pub mod constants;

/// Core reusable data structures
pub mod structures;

/// Byte-buffer embedding surface
pub mod api;

// Re-export commonly used items
pub use crate::core::config::CacheConfig;
pub use crate::core::error::CacheError;
pub use crate::structures::digest_trie::{CacheStats, Entry, Keys, NibbleCache, StoreOutcome};
