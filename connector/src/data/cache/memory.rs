//! In-memory backend on moka
//!
//! Default for single-process deployments. Markers vanish on restart, so
//! the worst case after a redeploy is one extra provider call per subject.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::backend::CacheBackend;
use super::error::CacheError;
use crate::core::config::CacheConfig;

/// Bytes plus the absolute deadline they live until
#[derive(Clone)]
struct StoredEntry {
    bytes: Vec<u8>,
    expires_at: Option<Instant>,
}

/// Derives each entry's lifetime from its own deadline, so entries with
/// different TTLs can share one cache
struct MarkerExpiry;

impl Expiry<String, StoredEntry> for MarkerExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredEntry,
        created_at: Instant,
    ) -> Option<Duration> {
        value
            .expires_at
            .map(|at| at.saturating_duration_since(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredEntry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value
            .expires_at
            .map(|at| at.saturating_duration_since(updated_at))
    }
}

pub struct InMemoryCache {
    store: Cache<String, StoredEntry>,
}

impl InMemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let store = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(MarkerExpiry)
            .build();
        Self { store }
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.store.get(key).await.map(|entry| entry.bytes))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        // checked_add: a TTL too large to represent degrades to no expiry
        let entry = StoredEntry {
            bytes: value,
            expires_at: ttl.and_then(|d| Instant::now().checked_add(d)),
        };
        self.store.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.contains_key(key))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let Some(entry) = self.store.get(key).await else {
            return Ok(None);
        };
        let Some(expires_at) = entry.expires_at else {
            return Ok(None);
        };
        // checked_duration_since goes None once the deadline passed but
        // the entry has not been evicted yet
        Ok(expires_at
            .checked_duration_since(Instant::now())
            .filter(|remaining| !remaining.is_zero()))
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        // Nothing to reach; always healthy
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
