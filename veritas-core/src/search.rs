//! Evidence search: web snippets for short claims
//!
//! `EvidenceSearch` is infallible at the trait boundary: implementations catch
//! every transport, auth and parse fault and hand back an empty `EvidenceSet`.
//! `SerpApiSearch::search_raw` keeps the typed `SearchError` for logging and tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::EvidenceSet;

/// Environment variable holding the SerpApi key.
pub const API_KEY_ENV: &str = "SERPAPI_KEY";

// ============================================================================
// EvidenceSearch trait
// ============================================================================

#[async_trait]
pub trait EvidenceSearch: Send + Sync {
    /// Snippets for `query` in provider rank order. Empty on any failure.
    async fn search(&self, query: &str) -> EvidenceSet;

    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Whether the provider has what it needs to answer (e.g. an API key).
    fn is_configured(&self) -> bool {
        true
    }
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Config
// ============================================================================

/// SerpApi client configuration
#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub engine: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
}

impl SerpApiConfig {
    /// Build from the `[search]` section; the key falls back to `SERPAPI_KEY`.
    pub fn from_config(config: &crate::config::SearchConfig) -> Self {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .unwrap_or_default();

        Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            engine: config.engine.clone(),
            max_results: config.max_results,
            timeout_seconds: config.timeout_seconds,
        }
    }
}

// ============================================================================
// SerpApi response structs (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    snippet: Option<String>,
}

// ============================================================================
// SerpApiSearch
// ============================================================================

/// Google results through SerpApi.
#[derive(Debug, Clone)]
pub struct SerpApiSearch {
    client: Client,
    config: SerpApiConfig,
}

impl SerpApiSearch {
    /// A missing key is not an error here; searches just come back empty.
    pub fn new(config: SerpApiConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            tracing::warn!("{} is not set; short claims will report search unavailable", API_KEY_ENV);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Run one search, surfacing the typed failure.
    pub async fn search_raw(&self, query: &str) -> Result<Vec<String>, SearchError> {
        if !self.has_api_key() {
            return Err(SearchError::MissingApiKey);
        }

        let url = format!("{}/search.json", self.config.base_url);
        let num = self.config.max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("api_key", self.config.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<SerpApiResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed.and_then(|r| r.error).unwrap_or(body);
            tracing::error!(code = status.as_u16(), message = %message, "SerpApi error");
            return Err(SearchError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.ok_or_else(|| {
            SearchError::InvalidResponse("response body is not a SerpApi result".to_string())
        })?;
        if let Some(message) = parsed.error {
            return Err(SearchError::Api {
                code: status.as_u16(),
                message,
            });
        }

        Ok(parsed
            .organic_results
            .into_iter()
            .filter_map(|r| r.snippet)
            .take(self.config.max_results)
            .collect())
    }
}

#[async_trait]
impl EvidenceSearch for SerpApiSearch {
    async fn search(&self, query: &str) -> EvidenceSet {
        match self.search_raw(query).await {
            Ok(snippets) => EvidenceSet::new(snippets),
            Err(e) => {
                tracing::warn!(error = %e, "Evidence search failed, reporting no results");
                EvidenceSet::empty()
            }
        }
    }

    fn name(&self) -> &str {
        "serpapi"
    }

    fn is_configured(&self) -> bool {
        self.has_api_key()
    }
}

// ============================================================================
// TESTS
// ============================================================================
