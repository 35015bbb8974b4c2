//! Image generation providers.
//!
//! `HttpImageProvider` posts the prompt to a configured endpoint and
//! expects a `{ "url": ... }` reply. `OfflineImageProvider` returns a
//! deterministic placeholder URL when no endpoint is configured.

use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::ImageConfig;
use sage_core::error::ImageError;
use sage_core::image::ImageProvider;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Select the image provider from configuration.
pub fn create_image_provider(config: &ImageConfig) -> Arc<dyn ImageProvider> {
    match &config.endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => {
            let api_key = std::env::var(&config.api_key_env).ok();
            Arc::new(HttpImageProvider::new(endpoint.clone(), api_key))
        }
        _ => {
            info!("No image endpoint configured; using offline placeholder provider");
            Arc::new(OfflineImageProvider)
        }
    }
}

/// HTTP image generation adapter.
pub struct HttpImageProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpImageProvider {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        debug!(prompt = %prompt, "Sending image generation request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&json!({ "prompt": prompt }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| ImageError::Transport {
            message: format!("Image request failed: {}", e),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ImageError::Transport {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(ImageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| ImageError::ResponseParse {
            message: format!("Invalid JSON: {}", e),
        })?;

        data.get("url")
            .and_then(|u| u.as_str())
            .filter(|u| !u.is_empty())
            .map(|u| u.to_string())
            .ok_or_else(|| ImageError::ResponseParse {
                message: "No url in image response".to_string(),
            })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Offline placeholder provider: deterministic URL, never leaves the
/// process.
pub struct OfflineImageProvider;

#[async_trait]
impl ImageProvider for OfflineImageProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        Ok(format!(
            "https://placehold.co/1024x768?text={}",
            urlencoding::encode(prompt)
        ))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
