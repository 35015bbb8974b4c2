//! Productivity-tool sinks and their dispatcher.
//!
//! Each sink requires its own credential; construction fails with
//! `SinkError::MissingCredential` when it is absent, and that failure is
//! scoped to the one sink. The registry routes by app name and answers
//! `Unsupported` for apps that are not sinks at all.

pub mod drive;
pub mod notion;
pub mod slack;

use sage_core::config::SinksConfig;
use sage_core::error::SinkError;
use sage_core::sinks::{Sink, SinkAck, SinkPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub use drive::DriveSink;
pub use notion::NotionSink;
pub use slack::SlackSink;

/// App names the dispatcher recognizes as sinks.
const KNOWN_SINKS: &[&str] = &["slack", "notion", "drive"];

/// Map caller-facing app names onto canonical sink names.
fn canonical_sink_name(app: &str) -> String {
    let name = app.trim().to_lowercase();
    match name.as_str() {
        "googledrive" | "google-drive" => "drive".to_string(),
        _ => name,
    }
}

/// Holds the sinks that could be constructed from configuration and
/// dispatches deliveries by app name.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: HashMap<String, Arc<dyn Sink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct every configured sink. A sink whose credential is missing
    /// is skipped with a warning; it will answer `MissingCredential` when
    /// addressed.
    pub fn from_config(config: &SinksConfig) -> Self {
        let mut registry = Self::new();

        if let Some(slack) = &config.slack {
            match SlackSink::new(slack) {
                Ok(sink) => registry.register(Arc::new(sink)),
                Err(e) => warn!(error = %e, "Skipping slack sink"),
            }
        }
        if let Some(notion) = &config.notion {
            match NotionSink::new(notion) {
                Ok(sink) => registry.register(Arc::new(sink)),
                Err(e) => warn!(error = %e, "Skipping notion sink"),
            }
        }
        if let Some(drive) = &config.drive {
            match DriveSink::new(drive) {
                Ok(sink) => registry.register(Arc::new(sink)),
                Err(e) => warn!(error = %e, "Skipping drive sink"),
            }
        }

        registry
    }

    pub fn register(&mut self, sink: Arc<dyn Sink>) {
        debug!(sink = sink.name(), "Registering sink");
        self.sinks.insert(sink.name().to_string(), sink);
    }

    /// Names of the registered sinks.
    pub fn available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sinks.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Deliver the payload to the named app.
    pub async fn deliver(
        &self,
        app: &str,
        payload: &SinkPayload,
    ) -> Result<SinkAck, SinkError> {
        let name = canonical_sink_name(app);
        if !KNOWN_SINKS.contains(&name.as_str()) {
            return Err(SinkError::Unsupported {
                app: app.to_string(),
            });
        }
        match self.sinks.get(&name) {
            Some(sink) => sink.deliver(payload).await,
            None => Err(SinkError::MissingCredential { sink: name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct RecordingSink {
        name: &'static str,
    }

    #[async_trait]
    impl Sink for RecordingSink {
        fn name(&self) -> &str {
            self.name
        }

        async fn deliver(&self, payload: &SinkPayload) -> Result<SinkAck, SinkError> {
            Ok(SinkAck {
                sink: self.name.to_string(),
                reference: Some(payload.title.clone()),
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_canonical_name() {
        let mut registry = SinkRegistry::new();
        registry.register(Arc::new(RecordingSink { name: "drive" }));

        let payload = SinkPayload::new("report", "body");
        let ack = registry.deliver("GoogleDrive", &payload).await.unwrap();
        assert_eq!(ack.sink, "drive");
        assert_eq!(ack.reference.as_deref(), Some("report"));

        let ack = registry.deliver("drive", &payload).await.unwrap();
        assert_eq!(ack.sink, "drive");
    }

    #[tokio::test]
    async fn test_unknown_app_is_unsupported() {
        let registry = SinkRegistry::new();
        let err = registry
            .deliver("jira", &SinkPayload::new("t", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Unsupported { .. }));
        assert!(err.to_string().contains("jira"));
    }

    #[tokio::test]
    async fn test_known_but_unregistered_sink_is_missing_credential() {
        let registry = SinkRegistry::new();
        let err = registry
            .deliver("slack", &SinkPayload::new("t", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::MissingCredential { .. }));
    }

    #[test]
    fn test_from_config_with_nothing_configured() {
        let registry = SinkRegistry::from_config(&SinksConfig::default());
        assert!(registry.available().is_empty());
    }
}
