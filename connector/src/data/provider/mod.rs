//! TechLens Domain API access

mod client;
mod types;

pub use client::{EnrichmentSource, ProviderError, TechLensClient};
pub use types::{ErrorEntry, ProviderFailure, ProviderResult, embedded_errors, format_error_details};
