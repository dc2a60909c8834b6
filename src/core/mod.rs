//! Core application components
//!
//! Support modules shared by the cache engine: construction parameters,
//! error types, and logging utilities.

/// Construction parameters for cache instances
pub mod config;

/// Error types surfaced by cache operations
pub mod error;

/// Feature-gated hot-path logging
pub mod logging;

pub use config::CacheConfig;
pub use error::CacheError;
