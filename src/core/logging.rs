//! Debug logging for the cache hot path
//!
//! Structural events (splits, evictions, sliced clears) go through
//! `tracing` at debug level. Per-operation diagnostics are far too chatty
//! for that, so they use the `debug_log!` macro below: without the
//! `debug-logging` feature it compiles to nothing, and with the feature it
//! is still gated at runtime by the `NC_DEBUG` environment variable.
//!
//! ```bash
//! # Enable all debug logging
//! NC_DEBUG=1 cargo test --features debug-logging
//!
//! # Enable logging for modules whose path contains "digest_trie"
//! NC_DEBUG=digest_trie cargo test --features debug-logging
//! ```

/// Runtime configuration for debug logging based on environment variables
#[cfg(feature = "debug-logging")]
pub mod config {
    use std::sync::OnceLock;

    struct DebugConfig {
        enabled: bool,
        patterns: Vec<String>,
    }

    static CONFIG: OnceLock<DebugConfig> = OnceLock::new();

    fn load() -> &'static DebugConfig {
        CONFIG.get_or_init(|| {
            let raw = std::env::var("NC_DEBUG").unwrap_or_default();
            let enabled = raw == "1" || raw == "all" || raw.to_lowercase() == "true";

            let mut patterns = Vec::new();
            if !raw.is_empty() && !enabled {
                patterns.push(raw);
            }

            DebugConfig { enabled, patterns }
        })
    }

    /// Check if debug logging is enabled for the given module path
    pub fn is_debug_enabled(module_path: &str) -> bool {
        let config = load();
        config.enabled || config.patterns.iter().any(|p| module_path.contains(p))
    }
}

/// Stub configuration module when debug-logging feature is disabled
#[cfg(not(feature = "debug-logging"))]
pub mod config {
    /// Stub function for when debug-logging feature is disabled
    #[allow(dead_code)] // Used by macros
    pub fn is_debug_enabled(_module_path: &str) -> bool {
        false
    }
}

/// Debug print macro controlled by environment variables and module path.
///
/// Usage:
/// ```ignore
/// debug_log!("store: depth={} sym={}", depth, sym);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug-logging")]
        {
            if $crate::core::logging::config::is_debug_enabled(module_path!()) {
                eprintln!($($arg)*);
            }
        }
    };
}
