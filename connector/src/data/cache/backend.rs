//! Storage interface the deduplication window runs on

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// One deduplication store.
///
/// Implementations hold opaque bytes under string keys and honor a
/// per-entry TTL. Markers expire on their own; nothing in the connector
/// deletes a key once written.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the bytes stored under `key`, `None` on a miss
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store bytes under `key`; `ttl == None` means the entry never expires
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<(), CacheError>;

    /// Whether `key` currently holds a live entry. The answer can be stale
    /// by the time the caller acts on it.
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Remaining lifetime of `key`, `None` for missing or non-expiring entries
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<(), CacheError>;

    /// Short name for log lines
    fn backend_name(&self) -> &'static str;
}
