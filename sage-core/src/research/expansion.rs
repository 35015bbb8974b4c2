//! Query expansion — decomposes a prompt into focused sub-queries.
//!
//! Two backends, selected explicitly at construction: the LLM backend asks
//! the model for 3-5 newline-separated sub-queries; the heuristic backend
//! produces a deterministic templated list and never leaves the process.

use crate::providers::FallbackChat;
use crate::types::{CompletionRequest, Message};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Upper bound on sub-queries per research round.
pub const MAX_SUB_QUERIES: usize = 5;

const EXPANDER_INSTRUCTION: &str =
    "You expand a research question into 3-5 highly specific sub-queries. \
     Return one per line, no numbering.";

const EXPANSION_TEMPERATURE: f32 = 0.4;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*\d.]+\s*").expect("list marker pattern"));

enum Backend {
    Heuristic,
    Chat(FallbackChat),
}

/// Decomposes a prompt into 1-5 sub-queries.
pub struct QueryExpander {
    backend: Backend,
}

impl QueryExpander {
    /// Deterministic expansion only; never calls a provider.
    pub fn heuristic() -> Self {
        Self {
            backend: Backend::Heuristic,
        }
    }

    /// LLM-backed expansion through the fallback chain.
    pub fn with_chat(chat: FallbackChat) -> Self {
        Self {
            backend: Backend::Chat(chat),
        }
    }

    /// Expand the prompt into sub-queries.
    ///
    /// Always yields between 1 and [`MAX_SUB_QUERIES`] entries: a provider
    /// error or an unusable completion degrades to a deterministic fallback
    /// list rather than aborting the research round.
    pub async fn expand(&self, prompt: &str) -> Vec<String> {
        match &self.backend {
            Backend::Heuristic => heuristic_expansion(prompt),
            Backend::Chat(chat) => {
                let request = CompletionRequest {
                    messages: vec![
                        Message::system(EXPANDER_INSTRUCTION),
                        Message::user(prompt),
                    ],
                    temperature: EXPANSION_TEMPERATURE,
                    max_tokens: None,
                    model: None,
                };

                match chat.complete(request).await {
                    Ok(response) => {
                        let lines = parse_sub_queries(&response.message.content);
                        if lines.is_empty() {
                            debug!("Expansion produced no usable lines; using minimal fallback");
                            minimal_expansion(prompt)
                        } else {
                            lines
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Query expansion failed; using minimal fallback");
                        minimal_expansion(prompt)
                    }
                }
            }
        }
    }
}

/// The deterministic 4-item expansion used when no provider is configured.
fn heuristic_expansion(prompt: &str) -> Vec<String> {
    vec![
        prompt.to_string(),
        format!("{prompt} funding and investors"),
        format!("{prompt} market size and trends"),
        format!("{prompt} key players and competitors"),
    ]
}

/// The deterministic 3-item fallback when the provider yields nothing usable.
fn minimal_expansion(prompt: &str) -> Vec<String> {
    vec![
        prompt.to_string(),
        format!("{prompt} recent"),
        format!("{prompt} key insights"),
    ]
}

/// Split a completion into sub-query lines: leading list markers stripped,
/// blanks discarded, capped at [`MAX_SUB_QUERIES`].
fn parse_sub_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUB_QUERIES)
        .collect()
}
