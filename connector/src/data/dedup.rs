//! Deduplication ledger over the cache service
//!
//! Records which subjects were enriched within the 24-hour window. The
//! ledger is an optimization, not a correctness mechanism: every operation
//! fails open, so a broken cache backend degrades to duplicate provider
//! calls rather than blocked enrichment.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::constants::ENRICHMENT_TTL_SECS;
use crate::data::cache::{CacheKey, CacheService};
use crate::utils::time::now_iso;

/// Value stored under the deduplication key. The payload is a marker; only
/// the key's existence drives the skip decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentMarker {
    pub lookup_key: String,
    /// UTC ISO 8601 timestamp of the provider call that wrote the marker
    pub enriched_at: String,
}

/// Tenant-scoped view of the deduplication window
pub struct DedupLedger {
    cache: Arc<CacheService>,
    tenant_id: String,
}

impl DedupLedger {
    pub fn new(cache: Arc<CacheService>, tenant_id: impl Into<String>) -> Self {
        Self {
            cache,
            tenant_id: tenant_id.into(),
        }
    }

    /// True when the subject has a live marker. Backend errors are logged
    /// and count as a miss.
    pub async fn is_recently_enriched(&self, lookup_key: &str) -> bool {
        let key = CacheKey::enrichment(&self.tenant_id, lookup_key);
        match self.cache.get::<EnrichmentMarker>(&key).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dedup check failed, treating as miss");
                false
            }
        }
    }

    /// Record a successful provider call, opening the 24-hour window.
    /// Backend errors are logged and swallowed.
    pub async fn mark_enriched(&self, lookup_key: &str) {
        let key = CacheKey::enrichment(&self.tenant_id, lookup_key);
        let marker = EnrichmentMarker {
            lookup_key: lookup_key.to_string(),
            enriched_at: now_iso(),
        };
        let ttl = Duration::from_secs(ENRICHMENT_TTL_SECS);
        if let Err(e) = self.cache.set(&key, &marker, Some(ttl)).await {
            tracing::warn!(key = %key, error = %e, "Failed to record enrichment marker");
        }
    }
}
