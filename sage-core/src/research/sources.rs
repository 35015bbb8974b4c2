//! Source list assembly with URL deduplication.
//!
//! Sources are unique by URL; order is first-seen across sub-query blocks.

use crate::search::{SearchBlock, SearchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A deduplicated (title, url) pair cited by a research report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// Collects sources across search blocks, keyed by URL.
#[derive(Debug, Default)]
pub struct SourceList {
    seen: HashSet<String>,
    entries: Vec<SourceRef>,
}

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every result across the given blocks, in block order.
    pub fn collect(blocks: &[SearchBlock]) -> Self {
        let mut list = Self::new();
        for block in blocks {
            for result in &block.results {
                list.push(result);
            }
        }
        list
    }

    /// Add one result. Results without a URL, and URLs already seen, are
    /// skipped. An empty title falls back to the result's domain.
    pub fn push(&mut self, result: &SearchResult) {
        if result.url.is_empty() || !self.seen.insert(result.url.clone()) {
            return;
        }
        let title = if result.title.is_empty() {
            result.domain()
        } else {
            result.title.clone()
        };
        self.entries.push(SourceRef {
            title,
            url: result.url.clone(),
        });
    }

    pub fn entries(&self) -> &[SourceRef] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SourceRef> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render sources as a markdown list, one line per entry.
pub fn sources_markdown(sources: &[SourceRef]) -> String {
    if sources.is_empty() {
        return "_No sources available._".to_string();
    }
    sources
        .iter()
        .map(|s| format!("- **{}** — {}", s.title, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}
