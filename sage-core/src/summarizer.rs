//! LLM-based summarization.
//!
//! A thin layer over the fallback chain with a fixed system instruction
//! and bounded output. Failure is absorbed here: downstream report
//! assembly must never abort because summarization failed, so any error
//! degrades to a fixed sentinel string.

use crate::providers::FallbackChat;
use crate::types::{CompletionRequest, Message};
use tracing::{debug, warn};

/// Sentinel returned whenever summarization fails.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable due to an error.";

/// Returned when the provider produced an empty completion.
pub const NO_SUMMARY_GENERATED: &str = "No summary generated.";

const SUMMARIZER_INSTRUCTION: &str =
    "You are a concise summarizer. Provide a clear, short, structured summary \
     of the content below.";

const SUMMARY_TEMPERATURE: f32 = 0.6;
const SUMMARY_MAX_TOKENS: usize = 400;

/// Generates summaries through the model fallback chain.
#[derive(Clone)]
pub struct Summarizer {
    chat: FallbackChat,
}

impl Summarizer {
    pub fn new(chat: FallbackChat) -> Self {
        Self { chat }
    }

    /// Summarize the prompt. Always returns text, never an error.
    pub async fn summarize(&self, prompt: &str) -> String {
        debug!(prompt_len = prompt.len(), "Summarizing");

        let request = CompletionRequest {
            messages: vec![
                Message::system(SUMMARIZER_INSTRUCTION),
                Message::user(prompt),
            ],
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            model: None,
        };

        match self.chat.complete(request).await {
            Ok(response) => {
                let text = response.message.content.trim();
                if text.is_empty() {
                    NO_SUMMARY_GENERATED.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}
