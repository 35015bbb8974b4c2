//! Integration tests for the Sage agent.
//!
//! Exercise the routing and research pipeline end-to-end through the
//! public API using MockLlmProvider and in-test collaborators.

use async_trait::async_trait;
use sage_core::brain::MockLlmProvider;
use sage_core::config::LlmConfig;
use sage_core::error::{ImageError, SearchError};
use sage_core::research::report::OFFLINE_BRIEF;
use sage_core::{
    Agent, AgentRequest, CAPABILITIES_REPLY, FallbackChat, ImageProvider, Message, QueryExpander,
    ResearchEngine, SearchProvider, SearchResult, Summarizer, ToolFlags,
};
use std::sync::Arc;

/// Search collaborator that answers every query with one distinct result.
struct PlaceholderSearch;

#[async_trait]
impl SearchProvider for PlaceholderSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        Ok(vec![SearchResult {
            title: format!("Mock: {query}"),
            url: format!("https://example.com/search?q={}", urlencoding::encode(query)),
            content: "offline placeholder result".to_string(),
        }])
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

struct PlaceholderImage;

#[async_trait]
impl ImageProvider for PlaceholderImage {
    async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
        Ok("https://example.com/image.png".to_string())
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

/// Build an agent with no LLM credential: heuristic expansion and a
/// summarizer whose provider always fails.
fn offline_agent() -> Agent {
    let llm = Arc::new(MockLlmProvider::new());
    llm.queue_failure(sage_core::LlmError::Connection {
        message: "offline".into(),
    });
    let chat = FallbackChat::with_candidates(llm, vec!["model-a".to_string()]);
    let search: Arc<dyn SearchProvider> = Arc::new(PlaceholderSearch);
    let summarizer = Summarizer::new(chat.clone());
    let research = ResearchEngine::new(
        QueryExpander::heuristic(),
        search.clone(),
        summarizer.clone(),
    );
    Agent::new(
        research,
        search,
        summarizer,
        Arc::new(PlaceholderImage),
        chat,
        &LlmConfig::default(),
    )
}

#[tokio::test]
async fn offline_deep_research_end_to_end() {
    let agent = offline_agent();
    let request = AgentRequest {
        messages: vec![Message::user("Acme Corp")],
        tools: ToolFlags {
            deep_research: true,
            ..Default::default()
        },
        files: Vec::new(),
    };

    let report = agent.run(request).await.unwrap();

    assert!(report.starts_with("# Deep Research: Acme Corp"));
    assert!(report.contains(OFFLINE_BRIEF));
    // Exactly 4 heuristic sub-queries, each contributing one distinct
    // example.com source.
    assert_eq!(report.matches("- **Mock: ").count(), 4);
    assert_eq!(report.matches("https://example.com/search?q=").count(), 4);
}

#[tokio::test]
async fn deep_research_flag_overrides_everything_else() {
    let agent = offline_agent();
    let request = AgentRequest {
        messages: vec![Message::user("draw a picture and search the web")],
        tools: ToolFlags {
            web_search: true,
            summarization: true,
            image_generation: true,
            deep_research: true,
        },
        files: Vec::new(),
    };

    let report = agent.run(request).await.unwrap();
    assert!(report.starts_with("# Deep Research: "));
}

#[tokio::test]
async fn plain_prompt_gets_capabilities_reply() {
    let agent = offline_agent();
    let request = AgentRequest {
        messages: vec![Message::user("hello")],
        tools: ToolFlags::default(),
        files: Vec::new(),
    };

    assert_eq!(agent.run(request).await.unwrap(), CAPABILITIES_REPLY);
}
