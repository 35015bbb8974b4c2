//! Image generation abstraction.
//!
//! The image generator is an external collaborator: the core only needs a
//! prompt-in, URL-out contract. Implementations live in the tools crate.

use crate::error::ImageError;
use async_trait::async_trait;

/// Trait for image generation providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image for the prompt and return its URL.
    async fn generate(&self, prompt: &str) -> Result<String, ImageError>;

    /// The provider name, for logging.
    fn name(&self) -> &str;
}
