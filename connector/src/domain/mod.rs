//! Domain logic for enrichment
//!
//! - `enrich` - Batch orchestration pipeline
//! - `expr` - Source expression language for mapping rules
//! - `mapping` - Provider response to attribute translation

pub mod enrich;
pub mod expr;
pub mod mapping;

pub use enrich::EnrichmentPipeline;
pub use expr::Expression;
