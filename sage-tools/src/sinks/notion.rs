//! Notion page-creation sink.

use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::NotionSinkConfig;
use sage_core::error::SinkError;
use sage_core::sinks::{Sink, SinkAck, SinkPayload};
use serde_json::{Value, json};
use tracing::debug;

const NOTION_VERSION: &str = "2022-06-28";

/// Creates a page in a Notion database with the payload title and a single
/// paragraph block holding the body.
#[derive(Debug)]
pub struct NotionSink {
    client: Client,
    base_url: String,
    api_key: String,
    database_id: String,
}

impl NotionSink {
    pub fn new(config: &NotionSinkConfig) -> Result<Self, SinkError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SinkError::MissingCredential {
                sink: "notion".to_string(),
            })?;
        let database_id = config
            .database_id
            .clone()
            .or_else(|| std::env::var(&config.database_id_env).ok())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SinkError::MissingCredential {
                sink: "notion".to_string(),
            })?;
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            database_id,
        })
    }

    fn page_body(&self, payload: &SinkPayload) -> Value {
        json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                "Name": {
                    "title": [
                        { "text": { "content": payload.title } }
                    ]
                }
            },
            "children": [
                {
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": {
                        "rich_text": [
                            { "type": "text", "text": { "content": payload.body } }
                        ]
                    }
                }
            ]
        })
    }
}

#[async_trait]
impl Sink for NotionSink {
    fn name(&self) -> &str {
        "notion"
    }

    async fn deliver(&self, payload: &SinkPayload) -> Result<SinkAck, SinkError> {
        let url = format!("{}/v1/pages", self.base_url);
        debug!(database_id = %self.database_id, "Creating notion page");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_body(payload))
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                sink: "notion".to_string(),
                message: format!("Page create request failed: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SinkError::Api {
                sink: "notion".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let reference = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));

        Ok(SinkAck {
            sink: "notion".to_string(),
            reference,
        })
    }
}
