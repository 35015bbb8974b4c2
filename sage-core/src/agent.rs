//! Agent router — dispatches a request to the right capability.
//!
//! Inspects the declared tool flags and the latest user message, then
//! delegates to deep research, search (+ optional summarization), image
//! generation, or a static capabilities reply, in that fixed priority
//! order. Stateless: each invocation is independent given its inputs.

use crate::error::SageError;
use crate::image::ImageProvider;
use crate::providers::FallbackChat;
use crate::research::ResearchEngine;
use crate::search::{SearchProvider, SearchResult};
use crate::summarizer::Summarizer;
use crate::types::{
    CompletionRequest, CompletionResponse, FileAttachment, Message, Role, StreamEvent, ToolFlags,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Fixed reply describing available capabilities.
///
/// Intent detection is a keyword heuristic, not a classifier; callers that
/// need certainty should set the tool flags and phrase requests plainly.
pub const CAPABILITIES_REPLY: &str = "I can research, summarize, and run deep-research. \
    Try: \"search X and summarize\" or toggle Deep Research.";

/// Returned in place of search output when the provider yields nothing.
pub const NO_RESULTS: &str = "No results found.";

const DEFAULT_PROMPT: &str = "Hello";

static SEARCH_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)search|find|look\s?up").expect("search intent pattern"));

static IMAGE_INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)image|picture|photo|draw|generate").expect("image intent pattern")
});

/// A request to run the agent: ordered messages plus tool toggles.
///
/// Attachments are accepted but not processed by the routing logic.
#[derive(Debug, Clone, Default)]
pub struct AgentRequest {
    pub messages: Vec<Message>,
    pub tools: ToolFlags,
    pub files: Vec<FileAttachment>,
}

/// The agent: routing plus the plain chat surface.
pub struct Agent {
    research: ResearchEngine,
    search: Arc<dyn SearchProvider>,
    summarizer: Summarizer,
    image: Arc<dyn ImageProvider>,
    chat: FallbackChat,
    chat_temperature: f32,
    chat_max_tokens: usize,
}

impl Agent {
    pub fn new(
        research: ResearchEngine,
        search: Arc<dyn SearchProvider>,
        summarizer: Summarizer,
        image: Arc<dyn ImageProvider>,
        chat: FallbackChat,
        config: &crate::config::LlmConfig,
    ) -> Self {
        Self {
            research,
            search,
            summarizer,
            image,
            chat,
            chat_temperature: config.temperature,
            chat_max_tokens: config.max_tokens,
        }
    }

    /// Route the request and return the reply text.
    ///
    /// Fixed priority, first match wins: deep research, search
    /// (+ summarize), image generation, capabilities reply.
    pub async fn run(&self, request: AgentRequest) -> Result<String, SageError> {
        if request.messages.is_empty() {
            return Err(SageError::MalformedRequest {
                reason: "request contains no messages".into(),
            });
        }

        let prompt = latest_user_prompt(&request.messages);
        let tools = request.tools;
        info!(prompt = %prompt, ?tools, files = request.files.len(), "Routing agent request");

        if tools.deep_research {
            debug!("Route: deep research");
            return Ok(self.research.research(&prompt).await?);
        }

        if tools.web_search && SEARCH_INTENT.is_match(&prompt) {
            debug!("Route: web search");
            let results_text = match self.search.search(&prompt).await {
                Ok(results) if !results.is_empty() => format_result_list(&results),
                Ok(_) => NO_RESULTS.to_string(),
                Err(e) => {
                    warn!(error = %e, "Web search failed");
                    NO_RESULTS.to_string()
                }
            };

            if tools.summarization {
                debug!("Route: summarization");
                let summary = self
                    .summarizer
                    .summarize(&crisp_brief_prompt(&results_text))
                    .await;
                return Ok(format!(
                    "🌐 **Search Results for:** {prompt}\n\n{results_text}\n\n---\n\n📝 **Summary**\n\n{summary}"
                ));
            }

            return Ok(format!(
                "🌐 **Top search results for:** {prompt}\n\n{results_text}"
            ));
        }

        if tools.image_generation && IMAGE_INTENT.is_match(&prompt) {
            debug!("Route: image generation");
            let url = self.image.generate(&prompt).await?;
            return Ok(format!("🖼️ **Generated Image**\n\n{url}"));
        }

        debug!("Route: capabilities reply");
        Ok(CAPABILITIES_REPLY.to_string())
    }

    /// Plain chat completion through the model fallback chain.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<CompletionResponse, SageError> {
        let request = self.chat_request(messages);
        Ok(self.chat.complete(request).await?)
    }

    /// Streaming chat completion through the model fallback chain.
    pub async fn chat_streaming(
        &self,
        messages: Vec<Message>,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), SageError> {
        let request = self.chat_request(messages);
        Ok(self.chat.complete_streaming(request, tx).await?)
    }

    fn chat_request(&self, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            messages,
            temperature: self.chat_temperature,
            max_tokens: Some(self.chat_max_tokens),
            model: None,
        }
    }
}

/// The most recent user-role message, trimmed; defaults to "Hello" when the
/// (non-empty) list has no usable user message.
fn latest_user_prompt(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
}

/// Numbered "title — url" lines, one per result.
fn format_result_list(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} — {}", i + 1, r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}

fn crisp_brief_prompt(search_text: &str) -> String {
    format!(
        "Summarize the following search notes into a crisp brief with bullet points \
         and a short conclusion:\n\n{search_text}"
    )
}
