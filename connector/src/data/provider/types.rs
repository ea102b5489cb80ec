//! TechLens wire shapes the connector reads
//!
//! The full profile document stays an untyped `serde_json::Value` so tenant
//! mapping rules can reach any field the API returns. Only the embedded
//! error envelope is typed: its shape drives the error-attribute contract.

use serde::Deserialize;
use serde_json::Value;

/// One entry of the `Errors` array a profile response may carry.
///
/// A response can be transport-successful (HTTP 200) and still report
/// lookup-level errors here, e.g. an unknown or unparseable domain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "Lookup", default)]
    pub lookup: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Code", default)]
    pub code: i64,
}

/// Extract embedded provider errors from a profile document.
///
/// Tolerant by design: a missing `Errors` key, a non-array value, or
/// entries with unexpected shapes all degrade to fewer (or zero) entries
/// rather than a failure.
pub fn embedded_errors(document: &Value) -> Vec<ErrorEntry> {
    document["Errors"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Render embedded errors as one human-readable string:
/// `"{Message} (Code: {Code})"` per entry, joined by `". "`.
pub fn format_error_details(entries: &[ErrorEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} (Code: {})", e.message, e.code))
        .collect::<Vec<_>>()
        .join(". ")
        .trim()
        .to_string()
}

/// Terminal failure of one provider call: transport error, non-2xx status,
/// or an unparseable body. Carried to the mapper, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub message: String,
    /// Raw failure context (status code, body snippet); shape is best-effort
    pub detail: Value,
}

/// Outcome of one provider call. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    /// Transport-level success; the document may still carry embedded errors
    Success { document: Value },
    Failure(ProviderFailure),
}
