//! LLM provider implementations.
//!
//! Provides the OpenAI-compatible chat-completions provider (Groq, OpenAI,
//! and any endpoint following the same wire format) and the model fallback
//! chain that tries candidate models in order.
//!
//! Use `create_provider()` to instantiate the appropriate provider based on
//! config: with a credential configured it talks to the real endpoint,
//! otherwise it degrades to the offline mock provider so the pipeline keeps
//! working during demos and tests.

pub mod fallback;
pub mod openai_compat;

use crate::brain::{LlmProvider, MockLlmProvider};
use crate::config::LlmConfig;
use std::sync::Arc;

pub use fallback::FallbackChat;
pub use openai_compat::OpenAiCompatProvider;

/// Built-in model preference list, tried after any caller override.
pub const DEFAULT_MODEL_FALLBACKS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "moonshotai/kimi-k2-instruct-0905",
    "groq/compound",
];

/// Canned reply returned by the offline mock provider.
pub const OFFLINE_CHAT_REPLY: &str = "Hi! (offline mock reply)";

/// Create an LLM provider based on the configuration.
///
/// With an API key present in the configured env var, returns the
/// OpenAI-compatible HTTP provider. Without one, returns a mock provider
/// with a canned reply so no request ever leaves the process.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    if config.has_credential() {
        match OpenAiCompatProvider::new(config) {
            Ok(provider) => return Arc::new(provider),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize chat provider; using offline mock");
            }
        }
    } else {
        tracing::info!(
            api_key_env = %config.api_key_env,
            "No chat credential configured; using offline mock provider"
        );
    }
    Arc::new(MockLlmProvider::always(OFFLINE_CHAT_REPLY))
}
