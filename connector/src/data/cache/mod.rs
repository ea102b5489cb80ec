//! Deduplication cache
//!
//! One `CacheService` facade over a pluggable [`CacheBackend`]: in-memory
//! (moka) by default, Redis (deadpool-redis) when several connector
//! instances must share the 24-hour window.

mod backend;
mod error;
mod key;
mod memory;
mod redis;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use backend::CacheBackend;
pub use error::CacheError;
pub use key::CacheKey;

use crate::core::config::{CacheBackendType, CacheConfig};
use memory::InMemoryCache;

/// Typed access to whichever backend the deployment selected.
///
/// Values go through MessagePack; the raw-bytes methods exist for callers
/// that manage their own encoding.
pub struct CacheService {
    backend: Arc<dyn CacheBackend>,
}

impl CacheService {
    /// Build the backend named by `config`. Redis construction reaches the
    /// network and fails fast on a bad URL.
    pub async fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        config
            .validate()
            .map_err(|e| CacheError::Config(e.to_string()))?;

        let backend: Arc<dyn CacheBackend> = match config.backend {
            CacheBackendType::Memory => {
                tracing::debug!(
                    max_entries = config.max_entries,
                    "Using in-memory dedup cache"
                );
                Arc::new(InMemoryCache::new(config))
            }
            CacheBackendType::Redis => Arc::new(redis::RedisCache::new(&config.redis_url).await?),
        };
        Ok(Self { backend })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    // =========================================================================
    // Typed API (MessagePack)
    // =========================================================================

    /// Decode the value under `key`, `None` on a miss
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(bytes) = self.get_bytes(key).await? else {
            return Ok(None);
        };
        let value =
            rmp_serde::from_slice(&bytes).map_err(|e| CacheError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    /// Encode `value` and store it under `key`
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let bytes =
            rmp_serde::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set_bytes(key, bytes, ttl).await
    }

    // =========================================================================
    // Raw bytes
    // =========================================================================

    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    pub async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl).await
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key).await
    }

    pub async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        self.backend.ttl(key).await
    }

    pub async fn health_check(&self) -> Result<(), CacheError> {
        self.backend.health_check().await
    }
}
