use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_REDIS_URL};

// =============================================================================
// Errors
// =============================================================================

/// Settings validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tenant id is required; it prefixes every deduplication cache key
    #[error("tenant_id must not be empty")]
    MissingTenantId,

    /// Redis backend selected without a connection URL
    #[error("cache backend is redis but redis_url is empty")]
    MissingRedisUrl,
}

// =============================================================================
// Cache Backend Selection
// =============================================================================

/// Cache backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendType {
    #[default]
    Memory,
    Redis,
}

impl fmt::Display for CacheBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackendType::Memory => write!(f, "memory"),
            CacheBackendType::Redis => write!(f, "redis"),
        }
    }
}

// =============================================================================
// Cache Config
// =============================================================================

/// Deduplication cache configuration (deployment concern, not tenant settings)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendType,
    /// Max entries held by the in-memory backend
    pub max_entries: u64,
    /// Connection URL for the Redis backend (Redis, Valkey, Dragonfly)
    pub redis_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendType::Memory,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: DEFAULT_CACHE_REDIS_URL.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == CacheBackendType::Redis && self.redis_url.trim().is_empty() {
            return Err(ConfigError::MissingRedisUrl);
        }
        Ok(())
    }
}

// =============================================================================
// Mapping Rule
// =============================================================================

/// One tenant-configured attribute mapping: evaluate `source_expression`
/// against the provider response and write the result to `target_attribute`.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingRule {
    /// Expression evaluated against the provider response document
    #[serde(rename = "source")]
    pub source_expression: String,
    /// Attribute key the result is written to, used exactly as configured
    #[serde(rename = "target")]
    pub target_attribute: String,
    /// When false, an existing attribute value is preserved
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

impl MappingRule {
    pub fn new(
        source_expression: impl Into<String>,
        target_attribute: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        Self {
            source_expression: source_expression.into(),
            target_attribute: target_attribute.into(),
            overwrite,
        }
    }
}

// =============================================================================
// Connector Settings
// =============================================================================

/// Per-tenant connector settings, deserialized from the platform-held
/// settings document. Loaded once at construction and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorSettings {
    /// Tenant (connector installation) id; prefixes deduplication cache keys
    pub tenant_id: String,
    /// TechLens API key; enrichment is a no-op while this is absent
    #[serde(default)]
    pub api_key: Option<String>,
    /// Segment ids whose member accounts are enriched on incremental syncs
    #[serde(default)]
    pub synchronized_segments: Vec<String>,
    /// Attribute mapping rules applied to successful provider responses
    #[serde(default)]
    pub mappings: Vec<MappingRule>,
}

impl ConnectorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_id.trim().is_empty() {
            return Err(ConfigError::MissingTenantId);
        }
        Ok(())
    }

    /// True when an API key is configured (non-empty after trimming)
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> ConnectorSettings {
        ConnectorSettings {
            tenant_id: "tenant-1".to_string(),
            api_key: Some("sk-test".to_string()),
            synchronized_segments: vec!["seg-a".to_string()],
            mappings: vec![],
        }
    }

    #[test]
    fn test_validate_accepts_complete_settings() {
        assert!(base_settings().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_tenant_id() {
        let mut settings = base_settings();
        settings.tenant_id = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingTenantId)
        ));
    }

    #[test]
    fn test_has_api_key_absent_and_blank() {
        let mut settings = base_settings();
        assert!(settings.has_api_key());

        settings.api_key = None;
        assert!(!settings.has_api_key());

        settings.api_key = Some("   ".to_string());
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ConnectorSettings =
            serde_json::from_value(serde_json::json!({ "tenant_id": "t1" })).unwrap();
        assert_eq!(settings.tenant_id, "t1");
        assert!(settings.api_key.is_none());
        assert!(settings.synchronized_segments.is_empty());
        assert!(settings.mappings.is_empty());
    }

    #[test]
    fn test_mapping_rule_deserialize_defaults_overwrite() {
        let rule: MappingRule = serde_json::from_value(serde_json::json!({
            "source": "Results[0].Meta.City",
            "target": "city"
        }))
        .unwrap();
        assert_eq!(rule.source_expression, "Results[0].Meta.City");
        assert_eq!(rule.target_attribute, "city");
        assert!(rule.overwrite);
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackendType::Memory);
        assert_eq!(config.max_entries, DEFAULT_CACHE_MAX_ENTRIES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_redis_requires_url() {
        let config = CacheConfig {
            backend: CacheBackendType::Redis,
            max_entries: 10,
            redis_url: "".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRedisUrl)
        ));
    }
}
