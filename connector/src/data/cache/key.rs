//! Cache key derivation

/// Cache key builder
///
/// Deduplication keys are shared state between connector deployments for the
/// same tenant, so their shape is a contract: changing it would re-enrich
/// every account once. Keys are NOT versioned for that reason.
pub struct CacheKey;

impl CacheKey {
    /// Deduplication key for one enriched subject.
    ///
    /// Exact shape: `{tenant_id}_enrich_{lookup_key}`, case-sensitive.
    pub fn enrichment(tenant_id: &str, lookup_key: &str) -> String {
        format!("{}_enrich_{}", tenant_id, lookup_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_key_shape() {
        assert_eq!(
            CacheKey::enrichment("tenant-1", "acme.com"),
            "tenant-1_enrich_acme.com"
        );
    }

    #[test]
    fn test_enrichment_key_is_case_sensitive() {
        assert_ne!(
            CacheKey::enrichment("tenant-1", "Acme.com"),
            CacheKey::enrichment("tenant-1", "acme.com")
        );
    }

    #[test]
    fn test_enrichment_key_distinct_tenants_never_collide() {
        assert_ne!(
            CacheKey::enrichment("tenant-1", "acme.com"),
            CacheKey::enrichment("tenant-2", "acme.com")
        );
    }
}
