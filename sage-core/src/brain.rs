//! LLM provider abstraction.
//!
//! Defines the `LlmProvider` trait for model-agnostic LLM interactions,
//! plus a queueable mock provider used in tests and offline mode.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Message, StreamEvent, TokenUsage};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Trait for LLM providers, supporting both full and streaming completions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Perform a streaming completion, sending events to the channel.
    ///
    /// The consumer must be prepared to receive an unbounded number of
    /// `Token` fragments of arbitrary size before `Done`.
    async fn complete_streaming(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), LlmError>;

    /// Return the default model name for this provider.
    fn model_name(&self) -> &str;
}

/// A mock LLM provider for testing and offline development.
///
/// Queued outcomes (successes or failures) are consumed in FIFO order;
/// once the queue is empty, every call returns the default text.
pub struct MockLlmProvider {
    model: String,
    default_text: String,
    outcomes: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
    requested_models: Mutex<Vec<Option<String>>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            default_text: "I'm a mock LLM. No queued responses available.".to_string(),
            outcomes: Mutex::new(Vec::new()),
            requested_models: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always returns the given text.
    pub fn always(text: &str) -> Self {
        let mut provider = Self::new();
        provider.default_text = text.to_string();
        provider
    }

    /// Queue a successful response for the next `complete` call.
    pub fn queue_response(&self, response: CompletionResponse) {
        self.outcomes.lock().unwrap().push(Ok(response));
    }

    /// Queue a failure for the next `complete` call.
    pub fn queue_failure(&self, error: LlmError) {
        self.outcomes.lock().unwrap().push(Err(error));
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// The `model` field of each request seen so far, in call order.
    pub fn requested_models(&self) -> Vec<Option<String>> {
        self.requested_models.lock().unwrap().clone()
    }

    /// Number of `complete`/`complete_streaming` calls seen so far.
    pub fn call_count(&self) -> usize {
        self.requested_models.lock().unwrap().len()
    }

    fn next_outcome(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requested_models
            .lock()
            .unwrap()
            .push(request.model.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Ok(Self::text_response(&self.default_text))
        } else {
            outcomes.remove(0)
        }
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.next_outcome(&request)
    }

    async fn complete_streaming(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), LlmError> {
        let response = self.next_outcome(&request)?;
        // Emit the text word-by-word so consumers exercise reassembly.
        for word in response.message.content.split_inclusive(' ') {
            let _ = tx.send(StreamEvent::Token(word.to_string())).await;
        }
        let _ = tx
            .send(StreamEvent::Done {
                usage: response.usage,
            })
            .await;
        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
