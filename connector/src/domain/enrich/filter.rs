//! Eligibility filter
//!
//! Pure classification of change events, no side effects. Output order
//! matches input order; every event becomes exactly one envelope.

use crate::core::constants::{SKIP_REASON_NO_LOOKUP_KEY, SKIP_REASON_NOT_IN_SEGMENT};

use super::types::{ChangeEvent, EnrichmentEnvelope, SyncMode};

/// Classify a batch of change events.
///
/// Batch-sourced events bypass the segment check: replays are assumed
/// pre-filtered upstream. The lookup-key check applies in both modes.
pub fn classify_batch(
    events: Vec<ChangeEvent>,
    mode: SyncMode,
    allowed_segments: &[String],
) -> Vec<EnrichmentEnvelope> {
    events
        .into_iter()
        .map(|event| classify(event, mode, allowed_segments))
        .collect()
}

fn classify(
    event: ChangeEvent,
    mode: SyncMode,
    allowed_segments: &[String],
) -> EnrichmentEnvelope {
    if mode == SyncMode::Incremental && !in_any_segment(&event.segments, allowed_segments) {
        return EnrichmentEnvelope::Skip {
            subject_id: event.subject_id,
            reasons: vec![SKIP_REASON_NOT_IN_SEGMENT.to_string()],
        };
    }
    match event.domain {
        Some(domain) if !domain.is_empty() => EnrichmentEnvelope::Enrich {
            subject_id: event.subject_id,
            lookup_key: domain,
        },
        _ => EnrichmentEnvelope::Skip {
            subject_id: event.subject_id,
            reasons: vec![SKIP_REASON_NO_LOOKUP_KEY.to_string()],
        },
    }
}

fn in_any_segment(actual: &[String], allowed: &[String]) -> bool {
    actual.iter().any(|id| allowed.contains(id))
}
