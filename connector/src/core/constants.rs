// =============================================================================
// Connector Identity
// =============================================================================

/// Connector name in title case (for display and status messages)
pub const CONNECTOR_NAME: &str = "TechLens";

/// Attribute group prefixed to every outgoing attribute key
pub const ATTRIBUTE_GROUP: &str = "techlens";

// =============================================================================
// Provider API
// =============================================================================

/// Default base URL of the TechLens Domain API
pub const DEFAULT_API_BASE: &str = "https://api.techlens.io/v2";

/// Profile endpoint appended to the base URL
pub const API_PROFILE_ENDPOINT: &str = "profile.json";

/// Query parameter carrying the API key
pub const API_PARAM_KEY: &str = "KEY";

/// Query parameter carrying the lookup key
pub const API_PARAM_LOOKUP: &str = "LOOKUP";

/// Provider HTTP timeout in seconds
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Object type whose mappable fields the connector can list
pub const OBJECT_TYPE_COMPANY: &str = "enrichcompany";

// =============================================================================
// Enrichment
// =============================================================================

/// Deduplication window in seconds (24 hours); a subject enriched within
/// this window is not sent to the provider again
pub const ENRICHMENT_TTL_SECS: u64 = 60 * 60 * 24;

/// Max lookup keys enriched concurrently within one batch
pub const MAX_CONCURRENT_ENRICHMENTS: usize = 8;

// =============================================================================
// Skip Reasons
// =============================================================================

/// Incremental event whose segments do not intersect the synchronized set
pub const SKIP_REASON_NOT_IN_SEGMENT: &str = "not in any synchronized segment";

/// Event without a usable lookup key
pub const SKIP_REASON_NO_LOOKUP_KEY: &str = "no identifying key";

/// Subject with a live deduplication cache entry
pub const SKIP_REASON_ALREADY_ENRICHED: &str = "already enriched within the past 24 hours";

// =============================================================================
// Error Attributes
// =============================================================================

/// Attribute name for the provider error description (unprefixed)
pub const ATTR_ERROR_DETAILS: &str = "error_details";

/// Attribute name for the enrichment success flag (unprefixed)
pub const ATTR_SUCCESS: &str = "success";

/// Attribute name for the last enrichment attempt timestamp (unprefixed)
pub const ATTR_LAST_ENRICHED_AT: &str = "last_enriched_at";

// =============================================================================
// Connector Status
// =============================================================================

/// Status message shown while the API key is missing
pub const STATUS_SETUP_REQUIRED_NO_API_KEY: &str =
    "No API key configured. Add your TechLens API key to the connector settings to start enriching accounts.";

// =============================================================================
// Cache
// =============================================================================

/// Default in-memory cache max entries
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 100_000;

/// Default Redis URL (works with Redis, Valkey, Dragonfly)
pub const DEFAULT_CACHE_REDIS_URL: &str = "redis://127.0.0.1:6379/0";
