//! Error types for the Sage agent core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the LLM, search, image, and sink domains.

/// Top-level error type for the Sage core library.
#[derive(Debug, thiserror::Error)]
pub enum SageError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Image generation error: {0}")]
    Image(#[from] ImageError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for operations that can fail with a [`SageError`].
pub type Result<T> = std::result::Result<T, SageError>;

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Streaming error: {message}")]
    Streaming { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    /// Every candidate model in the fallback chain failed. Carries the
    /// most recently attempted candidate's error.
    #[error("all candidate models failed; last error: {last}")]
    Exhausted { last: Box<LlmError> },
}

/// Errors from the web search provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("search request failed: {message}")]
    Transport { message: String },

    #[error("search response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the image generation provider.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("image request failed: {message}")]
    Transport { message: String },

    #[error("image response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from forwarding output to an external sink.
///
/// A sink failure is scoped to that sink only; it never affects an
/// unrelated pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("missing credential for sink '{sink}'")]
    MissingCredential { sink: String },

    #[error("sink '{sink}' returned HTTP {status}: {body}")]
    Api {
        sink: String,
        status: u16,
        body: String,
    },

    #[error("sink '{sink}' request failed: {message}")]
    Transport { sink: String, message: String },

    #[error("unsupported integration: {app}")]
    Unsupported { app: String },
}
