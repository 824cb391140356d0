//! Thread-safe cache of compiled JSON Schema validators.
//!
//! Schema compilation is expensive relative to validation; endpoints declare
//! a handful of schemas and serve many requests against them. The cache
//! stores compiled validators keyed by a content hash of the schema document
//! and shares them across requests via `Arc`.
//!
//! Caching can be disabled with `PARAMGATE_SCHEMA_CACHE=off` (see
//! [`crate::runtime_config::RuntimeConfig`]); a disabled cache compiles
//! on demand without storing.

use crate::runtime_config::RuntimeConfig;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

static GLOBAL_CACHE: Lazy<ValidatorCache> =
    Lazy::new(|| ValidatorCache::new(RuntimeConfig::from_env().schema_cache));

/// Content-hash keyed cache of compiled [`jsonschema::Validator`]s.
///
/// Keys are the first 16 hex characters of the SHA-256 hash of the canonical
/// schema JSON, so identical schema documents shared across endpoints compile
/// exactly once.
#[derive(Clone)]
pub struct ValidatorCache {
    cache: Arc<RwLock<HashMap<String, Arc<Validator>>>>,
    enabled: bool,
}

impl ValidatorCache {
    pub fn new(enabled: bool) -> Self {
        debug!(enabled = enabled, "initializing schema validator cache");
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    /// The process-wide cache, configured from the environment on first use.
    pub fn global() -> &'static ValidatorCache {
        &GLOBAL_CACHE
    }

    fn cache_key(schema: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(schema.to_string().as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        hash.chars().take(16).collect()
    }

    /// Get a cached validator or compile and cache a new one.
    ///
    /// Returns `None` when the schema fails to compile; the caller decides
    /// how to classify that (for the bundled engine it is server
    /// misconfiguration).
    pub fn get_or_compile(&self, schema: &Value) -> Option<Arc<Validator>> {
        if !self.enabled {
            return match jsonschema::validator_for(schema) {
                Ok(compiled) => Some(Arc::new(compiled)),
                Err(e) => {
                    error!(error = %e, "failed to compile JSON Schema");
                    None
                }
            };
        }

        let key = Self::cache_key(schema);

        // Fast path: read lock only
        {
            let cache = self.cache.read().expect("validator cache lock poisoned");
            if let Some(validator) = cache.get(&key) {
                debug!(cache_key = %key, "schema validator cache hit");
                return Some(Arc::clone(validator));
            }
        }

        match jsonschema::validator_for(schema) {
            Ok(compiled) => {
                let validator = Arc::new(compiled);
                let mut cache = self.cache.write().expect("validator cache lock poisoned");

                // Double-check: another thread may have compiled while we waited
                if let Some(existing) = cache.get(&key) {
                    debug!(cache_key = %key, "schema validator compiled by another thread");
                    return Some(Arc::clone(existing));
                }

                cache.insert(key.clone(), Arc::clone(&validator));
                info!(
                    cache_key = %key,
                    cache_size = cache.len(),
                    "schema validator compiled and cached"
                );
                Some(validator)
            }
            Err(e) => {
                error!(cache_key = %key, error = %e, "failed to compile JSON Schema");
                None
            }
        }
    }

    /// Number of validators currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .expect("validator cache lock poisoned")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached validators. Mainly useful in tests and when endpoint
    /// contracts are rebuilt at runtime.
    pub fn clear(&self) {
        let mut cache = self.cache.write().expect("validator cache lock poisoned");
        cache.clear();
        info!("schema validator cache cleared");
    }
}
