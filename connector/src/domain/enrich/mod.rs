//! Enrichment pipeline
//!
//! Orchestrates one batch of change events end to end:
//!
//! ```text
//! events ──▶ filter ──▶ skips ─────────────────────────▶ journal
//!               │
//!               ▼  grouped by lookup key, bounded concurrency
//!          dedup check ──hit──▶ journal skip
//!               │ miss
//!               ▼
//!          provider call ──transport failure──▶ error attributes ──▶ write
//!               │ transport success
//!               ▼
//!          cache marker ──▶ map (rules, or embedded errors) ──▶ write
//! ```
//!
//! One bad subject never aborts a batch: provider failures become error
//! attributes, collaborator errors are logged and counted, processing moves
//! on. Events sharing a lookup key run strictly sequentially, so the second
//! one lands on the marker the first one wrote.

mod filter;
mod journal;
mod types;
mod writer;


pub use filter::classify_batch;
pub use journal::{Journal, TracingJournal};
pub use types::{BatchOutcome, ChangeEvent, EnrichmentEnvelope, SyncMode};
pub use writer::AttributeWriter;

use std::sync::Arc;

use futures::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::config::ConnectorSettings;
use crate::core::constants::{MAX_CONCURRENT_ENRICHMENTS, SKIP_REASON_ALREADY_ENRICHED};
use crate::core::status::ConnectorStatus;
use crate::data::cache::CacheService;
use crate::data::dedup::DedupLedger;
use crate::data::provider::{EnrichmentSource, ProviderResult};
use crate::domain::mapping;
use crate::domain::mapping::catalog::{FieldsSchema, mappable_fields};

// =============================================================================
// Pipeline
// =============================================================================

/// Batch orchestrator wired from explicit collaborators.
///
/// Holds no mutable state; the deduplication cache is the only resource
/// shared across events, and it is accessed with plain get/set. Two
/// concurrent batches racing on the same subject is tolerated: the result
/// is idempotent and the worst case is one duplicate provider call.
pub struct EnrichmentPipeline {
    settings: Arc<ConnectorSettings>,
    dedup: DedupLedger,
    source: Arc<dyn EnrichmentSource>,
    writer: Arc<dyn AttributeWriter>,
    journal: Arc<dyn Journal>,
}

/// Terminal state of one subject's run through the pipeline
enum SubjectOutcome {
    Deduplicated,
    Enriched,
    Failed,
}

#[derive(Default)]
struct GroupCounts {
    deduplicated: usize,
    enriched: usize,
    failed: usize,
}

impl EnrichmentPipeline {
    pub fn new(
        settings: Arc<ConnectorSettings>,
        cache: Arc<CacheService>,
        source: Arc<dyn EnrichmentSource>,
        writer: Arc<dyn AttributeWriter>,
        journal: Arc<dyn Journal>,
    ) -> Self {
        let dedup = DedupLedger::new(cache, settings.tenant_id.clone());
        Self {
            settings,
            dedup,
            source,
            writer,
            journal,
        }
    }

    /// Process one batch of change events.
    ///
    /// Without a configured API key the batch is a no-op: a setup problem
    /// surfaced through [`Self::connector_status`], not an error. A fresh
    /// correlation key ties together every log line of the batch.
    pub async fn process_batch(&self, events: Vec<ChangeEvent>, mode: SyncMode) -> BatchOutcome {
        let span = tracing::info_span!(
            "enrichment_batch",
            correlation_key = %Uuid::new_v4(),
            mode = %mode,
        );
        self.run_batch(events, mode).instrument(span).await
    }

    /// Connector setup state for the platform status endpoint
    pub fn connector_status(&self) -> ConnectorStatus {
        ConnectorStatus::for_settings(&self.settings)
    }

    /// Source expressions configuration tooling can offer for mapping rules
    pub fn list_mappable_fields(&self, object_type: &str) -> FieldsSchema {
        mappable_fields(object_type)
    }

    async fn run_batch(&self, events: Vec<ChangeEvent>, mode: SyncMode) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            received: events.len(),
            ..BatchOutcome::default()
        };

        if !self.settings.has_api_key() {
            tracing::info!("No API key configured, outbound enrichment is a no-op");
            return outcome;
        }

        tracing::debug!(events = outcome.received, "Processing change events");

        let envelopes = classify_batch(events, mode, &self.settings.synchronized_segments);

        // Group enrichments by lookup key, first-seen order. Subjects that
        // share a key must run sequentially or they race the dedup marker.
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for envelope in envelopes {
            match envelope {
                EnrichmentEnvelope::Skip {
                    subject_id,
                    reasons,
                } => {
                    self.journal.skipped(&subject_id, &reasons).await;
                    outcome.skipped += 1;
                }
                EnrichmentEnvelope::Enrich {
                    subject_id,
                    lookup_key,
                } => match groups.iter_mut().find(|(key, _)| *key == lookup_key) {
                    Some((_, subjects)) => subjects.push(subject_id),
                    None => groups.push((lookup_key, vec![subject_id])),
                },
            }
        }

        if groups.is_empty() {
            tracing::debug!("No enrichable events in batch");
            return outcome;
        }

        let group_counts: Vec<GroupCounts> = futures::stream::iter(
            groups
                .into_iter()
                .map(|(lookup_key, subjects)| self.process_group(lookup_key, subjects)),
        )
        .buffer_unordered(MAX_CONCURRENT_ENRICHMENTS)
        .collect()
        .await;

        for counts in group_counts {
            outcome.deduplicated += counts.deduplicated;
            outcome.enriched += counts.enriched;
            outcome.failed += counts.failed;
        }

        tracing::debug!(
            received = outcome.received,
            skipped = outcome.skipped,
            deduplicated = outcome.deduplicated,
            enriched = outcome.enriched,
            failed = outcome.failed,
            "Batch complete"
        );
        outcome
    }

    /// Process all subjects sharing one lookup key, strictly in order
    async fn process_group(&self, lookup_key: String, subjects: Vec<String>) -> GroupCounts {
        let mut counts = GroupCounts::default();
        for subject_id in subjects {
            match self.process_subject(&subject_id, &lookup_key).await {
                SubjectOutcome::Deduplicated => counts.deduplicated += 1,
                SubjectOutcome::Enriched => counts.enriched += 1,
                SubjectOutcome::Failed => counts.failed += 1,
            }
        }
        counts
    }

    async fn process_subject(&self, subject_id: &str, lookup_key: &str) -> SubjectOutcome {
        if self.dedup.is_recently_enriched(lookup_key).await {
            self.journal
                .skipped(subject_id, &[SKIP_REASON_ALREADY_ENRICHED.to_string()])
                .await;
            return SubjectOutcome::Deduplicated;
        }

        let result = self.source.enrich(lookup_key).await;
        match &result {
            ProviderResult::Success { .. } => {
                // The marker keys off transport success; a response with
                // embedded provider errors still opens the 24-hour window
                self.dedup.mark_enriched(lookup_key).await;

                let attributes = mapping::map_response(&result, &self.settings.mappings);
                if let Err(e) = self.writer.write_attributes(subject_id, &attributes).await {
                    tracing::error!(subject_id = %subject_id, error = %e, "Attribute write failed");
                    self.journal.failed(subject_id, &e.to_string()).await;
                    return SubjectOutcome::Failed;
                }
                self.journal.enriched(subject_id, &attributes).await;
                SubjectOutcome::Enriched
            }
            ProviderResult::Failure(failure) => {
                let attributes = mapping::map_failure(failure);
                if let Err(e) = self.writer.write_attributes(subject_id, &attributes).await {
                    tracing::error!(subject_id = %subject_id, error = %e, "Attribute write failed");
                }
                self.journal.failed(subject_id, &failure.message).await;
                SubjectOutcome::Failed
            }
        }
    }
}
