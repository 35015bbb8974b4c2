//! Web search adapters.
//!
//! `TavilySearch` wraps the hosted search API with a single POST per query.
//! `OfflineSearch` is the explicit no-credential alternative: it fabricates
//! one placeholder result per query and never touches the network, so the
//! rest of the pipeline keeps working during demos and tests.

use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::SearchConfig;
use sage_core::error::SearchError;
use sage_core::search::{SearchProvider, SearchResult};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Select the search provider from configuration: the hosted adapter when
/// a credential is present, the offline mock otherwise.
pub fn create_search_provider(config: &SearchConfig) -> Arc<dyn SearchProvider> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Arc::new(TavilySearch::new(config, key)),
        _ => {
            info!(
                api_key_env = %config.api_key_env,
                "No search credential configured; using offline search provider"
            );
            Arc::new(OfflineSearch)
        }
    }
}

// ---------------------------------------------------------------------------
// TavilySearch
// ---------------------------------------------------------------------------

/// Hosted search API adapter.
pub struct TavilySearch {
    client: Client,
    base_url: String,
    api_key: String,
    max_results: usize,
    search_depth: String,
}

impl TavilySearch {
    pub fn new(config: &SearchConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_results: config.max_results,
            search_depth: config.search_depth.clone(),
        }
    }

    /// Normalize one provider result entry. Missing or malformed fields are
    /// defaulted rather than failing the whole response.
    fn normalize_entry(entry: &Value) -> SearchResult {
        SearchResult {
            title: entry
                .get("title")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("Untitled")
                .to_string(),
            url: entry
                .get("url")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            content: entry
                .get("content")
                .and_then(|v| v.as_str())
                .or_else(|| entry.get("snippet").and_then(|v| v.as_str()))
                .unwrap_or("")
                .to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "search_depth": self.search_depth,
            "include_answer": false,
            "include_images": false,
            "max_results": self.max_results,
        });

        debug!(query = %query, "Sending search request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Transport {
                message: format!("Search request failed: {}", e),
            })?;

        let status = response.status();
        let response_body = response.text().await.map_err(|e| SearchError::Transport {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                body: response_body,
            });
        }

        let data: Value =
            serde_json::from_str(&response_body).map_err(|e| SearchError::ResponseParse {
                message: format!("Invalid JSON: {}", e),
            })?;

        let results = data
            .get("results")
            .and_then(|r| r.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .take(self.max_results)
                    .map(Self::normalize_entry)
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

// ---------------------------------------------------------------------------
// OfflineSearch
// ---------------------------------------------------------------------------

/// Offline mock search provider: one synthetic result per query.
pub struct OfflineSearch;

#[async_trait]
impl SearchProvider for OfflineSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(vec![SearchResult {
            title: format!("Mock: {query}"),
            url: format!(
                "https://example.com/search?q={}",
                urlencoding::encode(query)
            ),
            content: "This is a mock search result because no search API key is set. \
                      Add TAVILY_API_KEY to the environment for real results."
                .to_string(),
        }])
    }

    fn name(&self) -> &str {
        "offline"
    }
}
