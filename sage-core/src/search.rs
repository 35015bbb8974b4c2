//! Web search abstraction.
//!
//! Defines the `SearchProvider` trait and the normalized result types.
//! Concrete adapters (the hosted search API and the offline mock) live in
//! the tools crate and are selected by configuration.

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single normalized search result.
///
/// The URL is the natural dedup key; missing provider fields are defaulted
/// upstream ("Untitled" title, empty content) rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Content snippet, possibly truncated by the provider.
    pub content: String,
}

impl SearchResult {
    /// The result's host with any leading "www." removed, falling back to
    /// the raw URL when it does not parse.
    pub fn domain(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| self.url.clone())
    }
}

/// The results for one sub-query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBlock {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Trait for web search providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a single search, returning at most the configured maximum
    /// number of results.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// The provider name, for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_domain_strips_www() {
        let result = SearchResult {
            title: "T".into(),
            url: "https://www.example.com/a/b".into(),
            content: String::new(),
        };
        assert_eq!(result.domain(), "example.com");
    }

    #[test]
    fn test_domain_falls_back_to_raw_url() {
        let result = SearchResult {
            title: "T".into(),
            url: "not a url".into(),
            content: String::new(),
        };
        assert_eq!(result.domain(), "not a url");
    }
}
