//! Slack incoming-webhook sink.

use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::SlackSinkConfig;
use sage_core::error::SinkError;
use sage_core::sinks::{Sink, SinkAck, SinkPayload};
use serde_json::json;
use tracing::debug;

/// Posts payloads to a Slack incoming webhook.
#[derive(Debug)]
pub struct SlackSink {
    client: Client,
    webhook_url: String,
}

impl SlackSink {
    /// Create the sink. The webhook URL comes from config, falling back to
    /// the configured environment variable; absence is a hard failure for
    /// this sink only.
    pub fn new(config: &SlackSinkConfig) -> Result<Self, SinkError> {
        let webhook_url = config
            .webhook_url
            .clone()
            .or_else(|| std::env::var(&config.webhook_url_env).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SinkError::MissingCredential {
                sink: "slack".to_string(),
            })?;
        Ok(Self {
            client: Client::new(),
            webhook_url,
        })
    }

    fn render_text(payload: &SinkPayload) -> String {
        if payload.title.is_empty() {
            payload.body.clone()
        } else {
            format!("*{}*\n{}", payload.title, payload.body)
        }
    }
}

#[async_trait]
impl Sink for SlackSink {
    fn name(&self) -> &str {
        "slack"
    }

    async fn deliver(&self, payload: &SinkPayload) -> Result<SinkAck, SinkError> {
        debug!("Posting to slack webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .json(&json!({ "text": Self::render_text(payload) }))
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                sink: "slack".to_string(),
                message: format!("Webhook request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Api {
                sink: "slack".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(SinkAck {
            sink: "slack".to_string(),
            reference: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_with_url(url: String) -> SlackSinkConfig {
        SlackSinkConfig {
            webhook_url: Some(url),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_webhook_is_missing_credential() {
        let config = SlackSinkConfig {
            webhook_url: None,
            webhook_url_env: "SAGE_TEST_NO_SUCH_WEBHOOK".to_string(),
        };
        let err = SlackSink::new(&config).unwrap_err();
        assert!(matches!(err, SinkError::MissingCredential { .. }));
    }

    #[test]
    fn test_render_text_prefixes_title() {
        let text = SlackSink::render_text(&SinkPayload::new("Report", "Body line"));
        assert_eq!(text, "*Report*\nBody line");
        let text = SlackSink::render_text(&SinkPayload::new("", "Body only"));
        assert_eq!(text, "Body only");
    }

    #[tokio::test]
    async fn test_deliver_posts_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T000/B000"))
            .and(body_partial_json(json!({ "text": "*Report*\nhello" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let sink = SlackSink::new(&config_with_url(format!(
            "{}/services/T000/B000",
            server.uri()
        )))
        .unwrap();
        let ack = sink
            .deliver(&SinkPayload::new("Report", "hello"))
            .await
            .unwrap();
        assert_eq!(ack.sink, "slack");
    }

    #[tokio::test]
    async fn test_deliver_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid_token"))
            .mount(&server)
            .await;

        let sink = SlackSink::new(&config_with_url(server.uri())).unwrap();
        let err = sink
            .deliver(&SinkPayload::new("t", "b"))
            .await
            .unwrap_err();
        match err {
            SinkError::Api { sink, status, body } => {
                assert_eq!(sink, "slack");
                assert_eq!(status, 403);
                assert_eq!(body, "invalid_token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
