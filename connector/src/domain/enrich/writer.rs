//! Outbound attribute-write boundary

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::mapping::AttributeSet;

/// The platform's per-subject attribute-write API, implemented by the host.
///
/// The pipeline treats a write as a black box: key/value/policy triples go
/// in, the host decides transport and batching. Errors are contained at the
/// per-subject boundary and never abort a batch.
#[async_trait]
pub trait AttributeWriter: Send + Sync {
    async fn write_attributes(&self, subject_id: &str, attributes: &AttributeSet) -> Result<()>;
}
