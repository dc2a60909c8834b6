//! Error types for cache operations
//!
//! Lookup misses are not errors; lookup operations return `Option`. The
//! store path is the only fallible one: it can reject inputs wider than
//! the payload length fields, or fail to allocate the payload block.

use thiserror::Error;

use crate::constants::{MAX_KEY_LEN, MAX_VALUE_LEN};

/// Errors surfaced by `store`.
///
/// Every variant leaves the cache structurally unchanged and the
/// accounting untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Key longer than the payload record's 2-byte length field can hold.
    #[error("key of {0} bytes exceeds the {max} byte limit", max = MAX_KEY_LEN)]
    KeyTooLong(usize),

    /// Value longer than the payload record's 4-byte length field can hold.
    #[error("value of {0} bytes exceeds the {max} byte limit", max = MAX_VALUE_LEN)]
    ValueTooLong(usize),

    /// The allocator refused the payload block.
    #[error("failed to allocate a {0} byte payload record")]
    AllocFailed(usize),
}
