//! TechLens Domain API client

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use super::types::{ProviderFailure, ProviderResult};
use crate::core::constants::{
    API_PARAM_KEY, API_PARAM_LOOKUP, API_PROFILE_ENDPOINT, DEFAULT_API_BASE, PROVIDER_TIMEOUT_SECS,
};

/// Max bytes of an error response body carried into failure details
const FAILURE_BODY_MAX_LEN: usize = 2048;

// =============================================================================
// Errors
// =============================================================================

/// Client construction errors. Calls themselves never error; see
/// [`EnrichmentSource::enrich`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider configuration error: {0}")]
    Config(String),
}

// =============================================================================
// Trait
// =============================================================================

/// A source of enrichment documents keyed by lookup key.
///
/// The signature is infallible: every failure mode folds into
/// `ProviderResult::Failure`, so one bad subject can never unwind a batch.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Fetch the profile document for one lookup key
    async fn enrich(&self, lookup_key: &str) -> ProviderResult;

    /// Source name for debugging/logging
    fn source_name(&self) -> &'static str;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP client for the TechLens Domain API.
///
/// One GET per lookup, no internal retry; the platform's re-delivery plus
/// the deduplication cache are the only retry mechanism.
pub struct TechLensClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl TechLensClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Override the API base URL (tests, proxies)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Profile endpoint: `{api_base}/profile.json`
    fn profile_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            API_PROFILE_ENDPOINT
        )
    }

    /// GET request for one lookup. The key and lookup ride as query
    /// parameters, never in the path.
    fn profile_request(&self, lookup_key: &str) -> reqwest::RequestBuilder {
        self.client.get(self.profile_url()).query(&[
            (API_PARAM_KEY, self.api_key.as_str()),
            (API_PARAM_LOOKUP, lookup_key),
        ])
    }
}

/// Truncate an error response body for inclusion in failure details
fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(FAILURE_BODY_MAX_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl EnrichmentSource for TechLensClient {
    async fn enrich(&self, lookup_key: &str) -> ProviderResult {
        let resp = match self.profile_request(lookup_key).send().await {
            Ok(resp) => resp,
            Err(e) => {
                // reqwest errors can embed the full request URL, which
                // carries the API key; strip it before the message escapes
                let message = e.without_url().to_string();
                tracing::debug!(lookup_key = %lookup_key, error = %message, "Provider request failed");
                return ProviderResult::Failure(ProviderFailure {
                    message,
                    detail: Value::Null,
                });
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(
                lookup_key = %lookup_key,
                status = status.as_u16(),
                "Provider returned non-success status"
            );
            return ProviderResult::Failure(ProviderFailure {
                message: format!("TechLens API returned HTTP {}", status.as_u16()),
                detail: json!({
                    "status": status.as_u16(),
                    "body": truncate_body(&body),
                }),
            });
        }

        match resp.json::<Value>().await {
            Ok(document) => ProviderResult::Success { document },
            Err(e) => {
                let message = e.without_url().to_string();
                tracing::debug!(lookup_key = %lookup_key, error = %message, "Provider response was not valid JSON");
                ProviderResult::Failure(ProviderFailure {
                    message,
                    detail: json!({ "status": status.as_u16() }),
                })
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "techlens"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_default_base() {
        let client = TechLensClient::new("sk-test").unwrap();
        assert_eq!(
            client.profile_url(),
            "https://api.techlens.io/v2/profile.json"
        );
    }

    #[test]
    fn test_profile_url_custom_base_trims_trailing_slash() {
        let client = TechLensClient::new("sk-test")
            .unwrap()
            .with_api_base("http://127.0.0.1:9999/v2/");
        assert_eq!(client.profile_url(), "http://127.0.0.1:9999/v2/profile.json");
    }

    #[test]
    fn test_profile_url_never_contains_api_key() {
        let client = TechLensClient::new("sk-super-secret").unwrap();
        assert!(!client.profile_url().contains("sk-super-secret"));
    }

    #[test]
    fn test_profile_request_carries_key_and_lookup_params() {
        let client = TechLensClient::new("sk-test").unwrap();
        let request = client.profile_request("acme.com").build().unwrap();

        assert_eq!(request.url().path(), "/v2/profile.json");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("KEY".to_string(), "sk-test".to_string()),
                ("LOOKUP".to_string(), "acme.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_truncate_body_short_input_untouched() {
        assert_eq!(truncate_body("{\"ok\":false}"), "{\"ok\":false}");
    }

    #[test]
    fn test_truncate_body_caps_long_input() {
        let body = "x".repeat(FAILURE_BODY_MAX_LEN * 2);
        assert_eq!(truncate_body(&body).len(), FAILURE_BODY_MAX_LEN);
    }

    #[test]
    fn test_source_name() {
        let client = TechLensClient::new("sk-test").unwrap();
        assert_eq!(client.source_name(), "techlens");
    }
}
