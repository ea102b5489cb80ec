//! Per-subject decision journal
//!
//! Every subject leaves the pipeline through exactly one journal entry:
//! skipped, enriched or failed. The trait keeps decision points separate
//! from log formatting; a host can forward entries to the platform's
//! activity feed instead.

use async_trait::async_trait;

use crate::domain::mapping::AttributeSet;

#[async_trait]
pub trait Journal: Send + Sync {
    /// Subject filtered out or suppressed by the deduplication window
    async fn skipped(&self, subject_id: &str, reasons: &[String]);

    /// Attributes emitted after a transport-successful provider call
    async fn enriched(&self, subject_id: &str, attributes: &AttributeSet);

    /// Provider or collaborator failure; error attributes were emitted
    async fn failed(&self, subject_id: &str, error: &str);
}

/// Journal writing structured log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingJournal;

#[async_trait]
impl Journal for TracingJournal {
    async fn skipped(&self, subject_id: &str, reasons: &[String]) {
        tracing::info!(subject_id = %subject_id, reasons = ?reasons, "Skipped enrichment");
    }

    async fn enriched(&self, subject_id: &str, attributes: &AttributeSet) {
        tracing::info!(
            subject_id = %subject_id,
            attributes = attributes.len(),
            "Enriched subject"
        );
    }

    async fn failed(&self, subject_id: &str, error: &str) {
        tracing::warn!(subject_id = %subject_id, error = %error, "Enrichment failed");
    }
}
