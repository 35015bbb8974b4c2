//! Research packet and report formatting.

use super::sources::{SourceRef, sources_markdown};
use crate::search::SearchBlock;
use serde::{Deserialize, Serialize};

/// Maximum characters of a result snippet carried into the packet.
pub const SNIPPET_MAX_CHARS: usize = 400;

/// Executive brief used when synthesis could not reach the provider.
pub const OFFLINE_BRIEF: &str = "**Summary (offline mock)**\n\n\
    - Could not reach the language model provider. Set GROQ_API_KEY for full synthesis.";

/// A completed research report. Transient: built once per invocation,
/// returned, and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    pub executive_brief: String,
    /// Deduplicated sources in first-seen order.
    pub sources: Vec<SourceRef>,
}

impl ResearchReport {
    /// Render the final formatted text: title line, executive brief,
    /// sources section.
    pub fn render(&self) -> String {
        [
            format!("# Deep Research: {}", self.topic),
            String::new(),
            "## Executive Brief".to_string(),
            self.executive_brief.trim().to_string(),
            String::new(),
            "## Sources".to_string(),
            sources_markdown(&self.sources),
        ]
        .join("\n")
    }
}

/// Concatenate per-sub-query result blocks into the research packet fed to
/// synthesis. Each block is headed by its sub-query.
pub fn build_packet(blocks: &[SearchBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            let items = block
                .results
                .iter()
                .map(|r| {
                    format!(
                        "• {}\n  URL: {}\n  Notes: {}…",
                        r.title,
                        r.url,
                        truncate_chars(&r.content, SNIPPET_MAX_CHARS)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            let items = if items.is_empty() {
                "• No results".to_string()
            } else {
                items
            };
            format!("### Query: {}\n{}", block.query, items)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Wrap the packet in the fixed synthesis instruction template.
pub fn synthesis_prompt(packet: &str) -> String {
    format!(
        "You are an expert research analyst. Merge and synthesize the findings below \
         into a concise, truthful brief with sections:\n\
         - Executive Summary (5-8 bullet points)\n\
         - Key Insights\n\
         - Risks / Unknowns\n\
         - Trends & Outlook\n\
         - Recommended Next Steps\n\n\
         Strict rules:\n\
         - Cite by hyperlink only in a \"Sources\" section (do not inline number them).\n\
         - Do NOT hallucinate. If uncertain, say so.\n\n\
         --- BEGIN FINDINGS ---\n{packet}\n--- END FINDINGS ---"
    )
}

/// Character-boundary-safe truncation.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
