//! Google Drive upload sink.

use async_trait::async_trait;
use reqwest::Client;
use sage_core::config::DriveSinkConfig;
use sage_core::error::SinkError;
use sage_core::sinks::{Sink, SinkAck, SinkPayload};
use serde_json::Value;
use tracing::debug;

/// Uploads the payload body as a plain-text file; the title becomes the
/// filename.
#[derive(Debug)]
pub struct DriveSink {
    client: Client,
    base_url: String,
    access_token: String,
}

impl DriveSink {
    pub fn new(config: &DriveSinkConfig) -> Result<Self, SinkError> {
        let access_token = std::env::var(&config.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| SinkError::MissingCredential {
                sink: "drive".to_string(),
            })?;
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }
}

#[async_trait]
impl Sink for DriveSink {
    fn name(&self) -> &str {
        "drive"
    }

    async fn deliver(&self, payload: &SinkPayload) -> Result<SinkAck, SinkError> {
        let url = format!("{}/upload/drive/v3/files?uploadType=media", self.base_url);
        debug!(filename = %payload.title, "Uploading to drive");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "text/plain")
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", payload.title),
            )
            .body(payload.body.clone())
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                sink: "drive".to_string(),
                message: format!("Upload request failed: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SinkError::Api {
                sink: "drive".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let reference = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));

        Ok(SinkAck {
            sink: "drive".to_string(),
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sink_for(server: &MockServer) -> DriveSink {
        // Safety: test-scoped env var with a unique name.
        unsafe { std::env::set_var("SAGE_TEST_DRIVE_TOKEN", "ya29.token") };
        let config = DriveSinkConfig {
            access_token_env: "SAGE_TEST_DRIVE_TOKEN".to_string(),
            base_url: server.uri(),
        };
        DriveSink::new(&config).unwrap()
    }

    #[test]
    fn test_missing_token_is_missing_credential() {
        let config = DriveSinkConfig {
            access_token_env: "SAGE_TEST_NO_SUCH_DRIVE_TOKEN".to_string(),
            ..Default::default()
        };
        let err = DriveSink::new(&config).unwrap_err();
        assert!(matches!(err, SinkError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn test_deliver_uploads_body_as_media() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/drive/v3/files"))
            .and(query_param("uploadType", "media"))
            .and(header("Authorization", "Bearer ya29.token"))
            .and(body_string("file contents"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "file-42" })),
            )
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        let ack = sink
            .deliver(&SinkPayload::new("notes.txt", "file contents"))
            .await
            .unwrap();
        assert_eq!(ack.sink, "drive");
        assert_eq!(ack.reference.as_deref(), Some("file-42"));
    }

    #[tokio::test]
    async fn test_deliver_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
            .mount(&server)
            .await;

        let sink = sink_for(&server);
        let err = sink
            .deliver(&SinkPayload::new("t", "b"))
            .await
            .unwrap_err();
        match err {
            SinkError::Api { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
