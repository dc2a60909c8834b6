//! Byte-buffer embedding surface
//!
//! Hosts that marshal raw byte buffers (native-addon bindings, FFI
//! layers) want owned buffers and numeric status codes rather than
//! borrowed slices and `Option`s. This module wraps the facade
//! accordingly: content is copied out into [`Bytes`] so callers never
//! alias engine memory, and every operation answers with a stable
//! [`Status`] code.

use bytes::Bytes;

use crate::core::config::CacheConfig;
use crate::structures::digest_trie::{CacheStats, NibbleCache, StoreOutcome};

/// Stable numeric status codes for host bindings.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Neutral success.
    Ok = 0,
    /// Store created a fresh record.
    Add = 1,
    /// Store replaced an existing record.
    Replace = 2,
    /// Not found, list boundary, or allocation failure.
    Err = 3,
}

/// Result record handed across the embedding boundary.
#[derive(Debug, Clone)]
pub struct Response {
    /// Operation status.
    pub status: Status,
    /// Copied-out content bytes: the value for lookups, the key for
    /// traversal operations. `None` on [`Status::Err`].
    pub content: Option<Bytes>,
    /// Flags byte stored with the record; 0 on [`Status::Err`].
    pub flags: u8,
}

impl Response {
    fn err() -> Self {
        Self {
            status: Status::Err,
            content: None,
            flags: 0,
        }
    }

    fn content(bytes: &[u8], flags: u8) -> Self {
        Self {
            status: Status::Ok,
            content: Some(Bytes::copy_from_slice(bytes)),
            flags,
        }
    }
}

/// Owning wrapper exposing the cache in host-marshalling form.
pub struct CacheHandle {
    cache: NibbleCache,
}

impl CacheHandle {
    /// Handle over a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            cache: NibbleCache::with_config(config),
        }
    }

    /// Handle over a cache bounded by the given key and byte budgets,
    /// with default trie tuning; 0 disables a budget.
    pub fn with_limits(max_keys: u64, max_bytes: u64) -> Self {
        Self::new(CacheConfig::bounded(max_keys, max_bytes))
    }

    /// Store a key/value pair.
    pub fn set(&mut self, key: &[u8], value: &[u8], flags: u8) -> Status {
        match self.cache.store(key, value, flags) {
            Ok(StoreOutcome::Added) => Status::Add,
            Ok(StoreOutcome::Replaced) => Status::Replace,
            Err(_) => Status::Err,
        }
    }

    /// Fetch a value, promoting the record in recency order.
    pub fn get(&mut self, key: &[u8]) -> Response {
        match self.cache.fetch(key) {
            Some(entry) => Response::content(entry.value, entry.flags),
            None => Response::err(),
        }
    }

    /// Fetch a value without promotion.
    pub fn peek(&self, key: &[u8]) -> Response {
        match self.cache.peek(key) {
            Some(entry) => Response::content(entry.value, entry.flags),
            None => Response::err(),
        }
    }

    /// Presence check.
    pub fn has(&self, key: &[u8]) -> bool {
        self.cache.has(key)
    }

    /// Remove a record.
    pub fn remove(&mut self, key: &[u8]) -> Status {
        if self.cache.remove(key) {
            Status::Ok
        } else {
            Status::Err
        }
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Clear one thick slice of the key space.
    pub fn clear_thick(&mut self, slice: u8) {
        self.cache.clear_thick(slice);
    }

    /// Clear one thin slice of the key space.
    pub fn clear_thin(&mut self, char1: u8, char2: u8) {
        self.cache.clear_thin(char1, char2);
    }

    /// Key of the most recently touched record.
    pub fn first_key(&self) -> Response {
        match self.cache.first_key() {
            Some(key) => Response::content(key, 0),
            None => Response::err(),
        }
    }

    /// Key one step less recent than `key`'s record.
    pub fn next_key(&self, key: &[u8]) -> Response {
        match self.cache.next_key(key) {
            Some(next) => Response::content(next, 0),
            None => Response::err(),
        }
    }

    /// Key of the least recently touched record.
    pub fn last_key(&self) -> Response {
        match self.cache.last_key() {
            Some(key) => Response::content(key, 0),
            None => Response::err(),
        }
    }

    /// Key one step more recent than `key`'s record.
    pub fn prev_key(&self, key: &[u8]) -> Response {
        match self.cache.prev_key(key) {
            Some(prev) => Response::content(prev, 0),
            None => Response::err(),
        }
    }

    /// Snapshot of the accounting counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
