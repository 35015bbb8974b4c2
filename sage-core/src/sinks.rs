//! Productivity-tool sink abstraction.
//!
//! A sink receives forwarded agent output (a report, a summary) and
//! delivers it to an external system. Each sink requires its own
//! credential; a failure in one sink never affects another pipeline stage.
//! Concrete sinks (Slack, Notion, Drive) live in the tools crate.

use crate::error::SinkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The structured payload forwarded to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkPayload {
    pub title: String,
    pub body: String,
}

impl SinkPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Acknowledgement returned by a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkAck {
    /// Name of the sink that accepted the payload.
    pub sink: String,
    /// Remote identifier of the created artifact, when the API returns one.
    pub reference: Option<String>,
}

/// Trait for productivity-tool sinks.
#[async_trait]
pub trait Sink: Send + Sync {
    /// The canonical sink name ("slack", "notion", "drive").
    fn name(&self) -> &str;

    /// Deliver the payload to the external system.
    async fn deliver(&self, payload: &SinkPayload) -> Result<SinkAck, SinkError>;
}
