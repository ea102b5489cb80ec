//! Data layer: deduplication cache and provider access

pub mod cache;
pub mod dedup;
pub mod provider;

pub use cache::{CacheBackend, CacheError, CacheKey, CacheService};
pub use dedup::{DedupLedger, EnrichmentMarker};
pub use provider::{
    EnrichmentSource, ErrorEntry, ProviderError, ProviderFailure, ProviderResult, TechLensClient,
};
