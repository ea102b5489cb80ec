//! TechLens enrichment connector
//!
//! Consumes change events for company records, enriches them through the
//! TechLens Domain API and hands the resulting attribute writes to the host
//! platform. The host supplies the outbound boundaries ([`AttributeWriter`],
//! [`Journal`]); everything in between lives here:
//!
//! - `core` - Configuration, constants, connector status
//! - `data` - Deduplication cache, provider HTTP client
//! - `domain` - Eligibility filtering, source expressions, attribute
//!   mapping, batch orchestration
//! - `utils` - Time helpers

pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

pub use crate::core::{CacheConfig, ConnectorSettings, ConnectorStatus, MappingRule, StatusKind};
pub use crate::data::{CacheService, EnrichmentSource, TechLensClient};
pub use crate::domain::EnrichmentPipeline;
pub use crate::domain::enrich::{
    AttributeWriter, BatchOutcome, ChangeEvent, Journal, SyncMode, TracingJournal,
};
pub use crate::domain::mapping::{Attribute, AttributeSet, WritePolicy};
