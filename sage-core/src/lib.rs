//! # Sage Core
//!
//! Core library for the Sage chat-agent orchestration service.
//! Provides the agent router, LLM interface with model fallback chain,
//! summarizer, deep-research pipeline, configuration, and the collaborator
//! traits implemented by the tools crate.

pub mod agent;
pub mod brain;
pub mod config;
pub mod error;
pub mod image;
pub mod providers;
pub mod research;
pub mod search;
pub mod sinks;
pub mod summarizer;
pub mod types;

// Re-export commonly used types at the crate root.
pub use agent::{Agent, AgentRequest, CAPABILITIES_REPLY};
pub use brain::{LlmProvider, MockLlmProvider};
pub use config::{LlmConfig, SageConfig, SearchConfig, load_config};
pub use error::{ImageError, LlmError, Result, SageError, SearchError, SinkError};
pub use image::ImageProvider;
pub use providers::{DEFAULT_MODEL_FALLBACKS, FallbackChat, OpenAiCompatProvider};
pub use research::{QueryExpander, ResearchEngine, ResearchReport};
pub use search::{SearchBlock, SearchProvider, SearchResult};
pub use sinks::{Sink, SinkAck, SinkPayload};
pub use summarizer::{SUMMARY_UNAVAILABLE, Summarizer};
pub use types::{
    CompletionRequest, CompletionResponse, FileAttachment, Message, Role, StreamEvent, TokenUsage,
    ToolFlags,
};
