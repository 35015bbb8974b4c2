//! Model fallback chain.
//!
//! Tries candidate models in a fixed order against a single provider:
//! a caller-supplied override first, then the built-in preference list.
//! The first success short-circuits; when every candidate fails, the most
//! recently attempted candidate's error is surfaced. One linear pass, no
//! retries and no backoff.

use crate::brain::LlmProvider;
use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, StreamEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A chat front-end that walks an ordered candidate model list.
#[derive(Clone)]
pub struct FallbackChat {
    provider: Arc<dyn LlmProvider>,
    candidates: Vec<String>,
}

impl FallbackChat {
    /// Build the chain from an optional override plus the built-in
    /// preference list. Empty entries are skipped and duplicates keep
    /// their first position.
    pub fn new(provider: Arc<dyn LlmProvider>, override_model: Option<String>) -> Self {
        let mut candidates: Vec<String> = Vec::new();
        let defaults = super::DEFAULT_MODEL_FALLBACKS.iter().map(|m| m.to_string());
        for model in override_model.into_iter().chain(defaults) {
            let model = model.trim().to_string();
            if !model.is_empty() && !candidates.contains(&model) {
                candidates.push(model);
            }
        }
        Self {
            provider,
            candidates,
        }
    }

    /// Build the chain from an explicit candidate list.
    pub fn with_candidates(provider: Arc<dyn LlmProvider>, candidates: Vec<String>) -> Self {
        let mut deduped: Vec<String> = Vec::new();
        for model in candidates {
            let model = model.trim().to_string();
            if !model.is_empty() && !deduped.contains(&model) {
                deduped.push(model);
            }
        }
        Self {
            provider,
            candidates: deduped,
        }
    }

    /// The candidate models in attempt order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates for one request: the request's own model override first.
    fn attempt_order(&self, request: &CompletionRequest) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        let request_model = request
            .model
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        for model in request_model.chain(self.candidates.iter().cloned()) {
            if !order.contains(&model) {
                order.push(model);
            }
        }
        order
    }

    /// Perform a full completion, trying each candidate model in order.
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let mut last_error = None;

        for model in self.attempt_order(&request) {
            let mut attempt = request.clone();
            attempt.model = Some(model.clone());

            match self.provider.complete(attempt).await {
                Ok(response) => {
                    debug!(model = %model, "Candidate model succeeded");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Candidate model failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            last: Box::new(last_error.unwrap_or(LlmError::Connection {
                message: "no candidate models configured".into(),
            })),
        })
    }

    /// Perform a streaming completion, trying each candidate model in order.
    ///
    /// Events are forwarded through `tx` as they arrive from the first
    /// candidate that accepts the request.
    pub async fn complete_streaming(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), LlmError> {
        let mut last_error = None;

        for model in self.attempt_order(&request) {
            let mut attempt = request.clone();
            attempt.model = Some(model.clone());

            match self.provider.complete_streaming(attempt, tx.clone()).await {
                Ok(()) => {
                    debug!(model = %model, "Candidate model succeeded (streaming)");
                    return Ok(());
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Candidate model streaming failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            last: Box::new(last_error.unwrap_or(LlmError::Connection {
                message: "no candidate models configured".into(),
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use crate::providers::DEFAULT_MODEL_FALLBACKS;
    use pretty_assertions::assert_eq;

    fn chain_with(provider: Arc<MockLlmProvider>, models: &[&str]) -> FallbackChat {
        FallbackChat::with_candidates(
            provider,
            models.iter().map(|m| m.to_string()).collect(),
        )
    }

    #[test]
    fn test_new_puts_override_first() {
        let provider = Arc::new(MockLlmProvider::new());
        let chat = FallbackChat::new(provider, Some("custom-model".to_string()));
        assert_eq!(chat.candidates()[0], "custom-model");
        assert_eq!(chat.candidates().len(), DEFAULT_MODEL_FALLBACKS.len() + 1);
    }

    #[test]
    fn test_new_skips_empty_and_duplicate_override() {
        let provider = Arc::new(MockLlmProvider::new());
        let chat = FallbackChat::new(provider.clone(), Some("  ".to_string()));
        assert_eq!(chat.candidates().len(), DEFAULT_MODEL_FALLBACKS.len());

        let chat = FallbackChat::new(provider, Some(DEFAULT_MODEL_FALLBACKS[1].to_string()));
        assert_eq!(chat.candidates()[0], DEFAULT_MODEL_FALLBACKS[1]);
        assert_eq!(chat.candidates().len(), DEFAULT_MODEL_FALLBACKS.len());
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_failure(LlmError::Connection {
            message: "a down".into(),
        });
        provider.queue_failure(LlmError::Connection {
            message: "b down".into(),
        });
        provider.queue_response(MockLlmProvider::text_response("from c"));

        let chat = chain_with(provider.clone(), &["model-a", "model-b", "model-c", "model-d"]);
        let response = chat.complete(CompletionRequest::default()).await.unwrap();
        assert_eq!(response.message.content, "from c");

        // model-d is never attempted.
        assert_eq!(
            provider.requested_models(),
            vec![
                Some("model-a".into()),
                Some("model-b".into()),
                Some("model-c".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_carries_most_recent_error() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_failure(LlmError::Connection {
            message: "a down".into(),
        });
        provider.queue_failure(LlmError::Connection {
            message: "b down".into(),
        });

        let chat = chain_with(provider, &["model-a", "model-b"]);
        let err = chat.complete(CompletionRequest::default()).await.unwrap_err();
        match err {
            LlmError::Exhausted { last } => {
                assert_eq!(last.to_string(), "Provider connection failed: b down");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_model_override_is_tried_first() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_response(MockLlmProvider::text_response("ok"));

        let chat = chain_with(provider.clone(), &["model-a"]);
        let request = CompletionRequest {
            model: Some("per-request".to_string()),
            ..Default::default()
        };
        chat.complete(request).await.unwrap();
        assert_eq!(provider.requested_models(), vec![Some("per-request".into())]);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_exhausted() {
        let provider = Arc::new(MockLlmProvider::new());
        let chat = chain_with(provider, &[]);
        let err = chat.complete(CompletionRequest::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn test_streaming_falls_through_to_working_candidate() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_failure(LlmError::Streaming {
            message: "a refused".into(),
        });
        provider.queue_response(MockLlmProvider::text_response("streamed text"));

        let chat = chain_with(provider, &["model-a", "model-b"]);
        let (tx, mut rx) = mpsc::channel(32);
        chat.complete_streaming(CompletionRequest::default(), tx)
            .await
            .unwrap();

        let mut text = String::new();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Token(t) => text.push_str(&t),
                StreamEvent::Done { .. } => break,
                StreamEvent::Error(e) => panic!("unexpected stream error: {e}"),
            }
        }
        assert_eq!(text, "streamed text");
    }
}
