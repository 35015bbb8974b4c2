//! # Sage Tools
//!
//! Collaborator implementations for the Sage agent: the hosted web search
//! adapter and its offline mock, image generation providers, and the
//! Slack/Notion/Drive sinks with their dispatcher.

pub mod imagegen;
pub mod sinks;
pub mod web;

pub use imagegen::{HttpImageProvider, OfflineImageProvider, create_image_provider};
pub use sinks::{DriveSink, NotionSink, SinkRegistry, SlackSink};
pub use web::{OfflineSearch, TavilySearch, create_search_provider};
