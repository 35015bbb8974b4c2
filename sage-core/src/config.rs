//! Configuration system for Sage.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment. Configuration is loaded from
//! `~/.config/sage/config.toml` and/or `.sage/config.toml` in the workspace
//! directory, then overridden by `SAGE_`-prefixed environment variables
//! (nested keys split on `__`, e.g. `SAGE_LLM__MODEL`).
//!
//! Credentials are never stored in config files; config carries the *name*
//! of the environment variable holding each secret, and adapters resolve it
//! at construction time.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the Sage agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SageConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub image: ImageConfig,
    pub sinks: SinksConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Optional model override, tried before the fallback candidates.
    pub model: Option<String>,
    /// Ordered candidate models tried after the override.
    pub fallback_models: Vec<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override for the chat-completions endpoint.
    pub base_url: Option<String>,
    /// Maximum tokens to generate in a chat response.
    pub max_tokens: usize,
    /// Default temperature for chat generation.
    pub temperature: f32,
    /// Whether chat responses stream token-by-token.
    pub use_streaming: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            fallback_models: crate::providers::DEFAULT_MODEL_FALLBACKS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: None,
            max_tokens: 2000,
            temperature: 0.7,
            use_streaming: true,
        }
    }
}

impl LlmConfig {
    /// Whether an API key is available for the chat provider.
    pub fn has_credential(&self) -> bool {
        std::env::var(&self.api_key_env)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Web search provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Environment variable name containing the search API key.
    pub api_key_env: String,
    /// Base URL of the search API.
    pub base_url: String,
    /// Maximum results returned per query.
    pub max_results: usize,
    /// Provider-side search depth ("basic" or "advanced").
    pub search_depth: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            base_url: "https://api.tavily.com".to_string(),
            max_results: 5,
            search_depth: "advanced".to_string(),
        }
    }
}

impl SearchConfig {
    /// Whether an API key is available for the search provider.
    pub fn has_credential(&self) -> bool {
        std::env::var(&self.api_key_env)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Image generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Endpoint of the image generation API. When unset, the offline
    /// placeholder provider is used.
    pub endpoint: Option<String>,
    /// Environment variable name containing the image API key.
    pub api_key_env: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "IMAGE_API_KEY".to_string(),
        }
    }
}

/// Configuration for the productivity-tool sinks.
///
/// Each sink requires its own credential; an unset section leaves that
/// sink unregistered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack: Option<SlackSinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion: Option<NotionSinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive: Option<DriveSinkConfig>,
}

/// Slack incoming-webhook sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSinkConfig {
    /// Explicit webhook URL; takes precedence over the env var.
    pub webhook_url: Option<String>,
    /// Environment variable name containing the webhook URL.
    pub webhook_url_env: String,
}

impl Default for SlackSinkConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_url_env: "SLACK_WEBHOOK_URL".to_string(),
        }
    }
}

/// Notion page-creation sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionSinkConfig {
    /// Environment variable name containing the Notion API key.
    pub api_key_env: String,
    /// Target database id; falls back to the env var when unset.
    pub database_id: Option<String>,
    /// Environment variable name containing the database id.
    pub database_id_env: String,
    /// Base URL of the Notion API.
    pub base_url: String,
}

impl Default for NotionSinkConfig {
    fn default() -> Self {
        Self {
            api_key_env: "NOTION_API_KEY".to_string(),
            database_id: None,
            database_id_env: "NOTION_DATABASE_ID".to_string(),
            base_url: "https://api.notion.com".to_string(),
        }
    }
}

/// Google Drive upload sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSinkConfig {
    /// Environment variable name containing the Drive access token.
    pub access_token_env: String,
    /// Base URL of the Drive upload API.
    pub base_url: String,
}

impl Default for DriveSinkConfig {
    fn default() -> Self {
        Self {
            access_token_env: "GOOGLE_DRIVE_ACCESS_TOKEN".to_string(),
            base_url: "https://www.googleapis.com".to_string(),
        }
    }
}

/// Path of the per-user config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sage")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration with layering: defaults -> user file -> workspace
/// file -> `SAGE_` environment variables.
pub fn load_config(workspace_dir: &Path) -> std::result::Result<SageConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(SageConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    let ws_config = workspace_dir.join(".sage").join("config.toml");
    if ws_config.exists() {
        figment = figment.merge(Toml::file(&ws_config));
    }

    figment = figment.merge(Env::prefixed("SAGE_").split("__"));

    figment.extract().map_err(Box::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = SageConfig::default();
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.llm.max_tokens, 2000);
        assert!(!config.llm.fallback_models.is_empty());
        assert_eq!(config.search.max_results, 5);
        assert!(config.sinks.slack.is_none());
        assert!(config.image.endpoint.is_none());
    }

    #[test]
    fn test_workspace_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let sage_dir = dir.path().join(".sage");
        std::fs::create_dir_all(&sage_dir).unwrap();
        std::fs::write(
            sage_dir.join("config.toml"),
            r#"
[llm]
model = "test-model"
max_tokens = 512

[search]
max_results = 3

[sinks.slack]
webhook_url = "https://hooks.example.com/T000/B000"
"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.llm.model.as_deref(), Some("test-model"));
        assert_eq!(config.llm.max_tokens, 512);
        // Unset keys keep their defaults.
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.search.max_results, 3);
        let slack = config.sinks.slack.expect("slack section present");
        assert_eq!(
            slack.webhook_url.as_deref(),
            Some("https://hooks.example.com/T000/B000")
        );
        assert_eq!(slack.webhook_url_env, "SLACK_WEBHOOK_URL");
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.search.search_depth, "advanced");
    }
}
