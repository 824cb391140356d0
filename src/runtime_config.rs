//! Environment-variable runtime configuration.
//!
//! ## Environment variables
//!
//! ### `PARAMGATE_SCHEMA_CACHE`
//!
//! Toggles the process-wide compiled-validator cache. Any of `off`, `false`
//! or `0` (case-insensitive) disables it; everything else, including an
//! unset variable, leaves it enabled. Disable it when schema documents are
//! generated per request and caching would only grow the map.

use std::env;

/// Runtime configuration loaded from environment variables.
///
/// Load once at startup with [`RuntimeConfig::from_env()`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Whether compiled schema validators are cached (default: true)
    pub schema_cache: bool,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let schema_cache = cache_enabled(env::var("PARAMGATE_SCHEMA_CACHE").ok().as_deref());
        RuntimeConfig { schema_cache }
    }
}

fn cache_enabled(raw: Option<&str>) -> bool {
    match raw {
        Some(val) => !matches!(
            val.to_ascii_lowercase().as_str(),
            "off" | "false" | "0"
        ),
        None => true,
    }
}
