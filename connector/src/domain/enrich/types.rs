//! Pipeline input and outcome types

use std::fmt;

use serde::Deserialize;

/// One subject change delivered by the hosting platform
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEvent {
    /// Platform identity of the subject
    pub subject_id: String,
    /// Primary domain of the subject, the provider lookup key
    #[serde(default)]
    pub domain: Option<String>,
    /// Ids of the segments the subject currently belongs to
    #[serde(default)]
    pub segments: Vec<String>,
}

/// How a batch of events reached the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Notification delivery; segment filtering applies
    Incremental,
    /// Operator-triggered replay, pre-filtered upstream of the connector
    Batch,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Incremental => write!(f, "incremental"),
            SyncMode::Batch => write!(f, "batch"),
        }
    }
}

/// Filter decision for one event
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentEnvelope {
    Enrich {
        subject_id: String,
        lookup_key: String,
    },
    Skip {
        subject_id: String,
        reasons: Vec<String>,
    },
}

/// Counters for one `process_batch` run.
///
/// `received` always equals `skipped + deduplicated + enriched + failed`
/// once the batch completes, except for the no-API-key no-op where only
/// `received` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub received: usize,
    /// Filtered out before any provider contact
    pub skipped: usize,
    /// Suppressed by a live deduplication marker
    pub deduplicated: usize,
    /// Provider call transport-successful, attributes emitted
    pub enriched: usize,
    /// Transport failure or collaborator error, error attributes emitted
    pub failed: usize,
}
