//! Connector setup status reported back to the platform.

use std::fmt;

use serde::Serialize;

use super::config::ConnectorSettings;
use super::constants::STATUS_SETUP_REQUIRED_NO_API_KEY;

/// Overall connector health as the platform displays it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Ok,
    SetupRequired,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Ok => write!(f, "ok"),
            StatusKind::SetupRequired => write!(f, "setupRequired"),
        }
    }
}

/// Status payload: the kind plus human-readable messages explaining it
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorStatus {
    pub status: StatusKind,
    pub messages: Vec<String>,
}

impl ConnectorStatus {
    /// Derive the status from the tenant settings. Enrichment cannot run
    /// without an API key, so its absence reports as setup required.
    pub fn for_settings(settings: &ConnectorSettings) -> Self {
        if !settings.has_api_key() {
            return Self {
                status: StatusKind::SetupRequired,
                messages: vec![STATUS_SETUP_REQUIRED_NO_API_KEY.to_string()],
            };
        }
        Self {
            status: StatusKind::Ok,
            messages: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(api_key: Option<&str>) -> ConnectorSettings {
        ConnectorSettings {
            tenant_id: "tenant-1".to_string(),
            api_key: api_key.map(String::from),
            synchronized_segments: vec![],
            mappings: vec![],
        }
    }

    #[test]
    fn test_status_ok_with_api_key() {
        let status = ConnectorStatus::for_settings(&settings_with_key(Some("sk-live")));
        assert_eq!(status.status, StatusKind::Ok);
        assert!(status.messages.is_empty());
    }

    #[test]
    fn test_status_setup_required_without_api_key() {
        let status = ConnectorStatus::for_settings(&settings_with_key(None));
        assert_eq!(status.status, StatusKind::SetupRequired);
        assert_eq!(status.messages, vec![STATUS_SETUP_REQUIRED_NO_API_KEY]);
    }

    #[test]
    fn test_status_kind_serializes_camel_case() {
        let json = serde_json::to_string(&StatusKind::SetupRequired).unwrap();
        assert_eq!(json, "\"setupRequired\"");
    }
}
