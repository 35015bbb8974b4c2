//! Research engine — coordinates the expand → search → synthesize pipeline.

use super::expansion::QueryExpander;
use super::report::{OFFLINE_BRIEF, ResearchReport, build_packet, synthesis_prompt};
use super::sources::SourceList;
use crate::error::SearchError;
use crate::search::{SearchBlock, SearchProvider};
use crate::summarizer::{SUMMARY_UNAVAILABLE, Summarizer};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Coordinates query expansion, concurrent search, and synthesis into a
/// formatted research report.
///
/// No retries across steps: expansion and synthesis degrade to fallback
/// values, while a search failure aborts the whole round with no partial
/// results.
pub struct ResearchEngine {
    expander: QueryExpander,
    search: Arc<dyn SearchProvider>,
    summarizer: Summarizer,
}

impl ResearchEngine {
    pub fn new(
        expander: QueryExpander,
        search: Arc<dyn SearchProvider>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            expander,
            search,
            summarizer,
        }
    }

    /// Run the full pipeline and render the formatted report text.
    pub async fn research(&self, prompt: &str) -> Result<String, SearchError> {
        Ok(self.run(prompt).await?.render())
    }

    /// Run the full pipeline and return the structured report.
    pub async fn run(&self, prompt: &str) -> Result<ResearchReport, SearchError> {
        let sub_queries = self.expander.expand(prompt).await;
        info!(
            provider = self.search.name(),
            sub_queries = sub_queries.len(),
            "Starting research round"
        );

        // All sub-query searches run concurrently and are joined. A single
        // failure fails the round: no partial results are returned.
        let searches = sub_queries.iter().map(|q| self.search_block(q));
        let blocks: Vec<SearchBlock> = try_join_all(searches).await?;

        let packet = build_packet(&blocks);
        let sources = SourceList::collect(&blocks);
        debug!(
            blocks = blocks.len(),
            sources = sources.len(),
            packet_len = packet.len(),
            "Assembled research packet"
        );

        let summary = self.summarizer.summarize(&synthesis_prompt(&packet)).await;
        let executive_brief = if summary.is_empty() || summary == SUMMARY_UNAVAILABLE {
            OFFLINE_BRIEF.to_string()
        } else {
            summary.trim().to_string()
        };

        Ok(ResearchReport {
            topic: prompt.to_string(),
            executive_brief,
            sources: sources.into_entries(),
        })
    }

    async fn search_block(&self, query: &str) -> Result<SearchBlock, SearchError> {
        let results = self.search.search(query).await?;
        Ok(SearchBlock {
            query: query.to_string(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use crate::error::LlmError;
    use crate::providers::FallbackChat;
    use crate::search::SearchResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test search provider returning one canned result per query, with an
    /// optional failing query.
    struct ScriptedSearch {
        fail_on: Option<String>,
        url_for: fn(&str) -> String,
        queries_seen: Mutex<Vec<String>>,
    }

    impl ScriptedSearch {
        fn new() -> Self {
            Self {
                fail_on: None,
                url_for: |q| format!("https://mock.example/{}", q.replace(' ', "-")),
                queries_seen: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(query: &str) -> Self {
            let mut s = Self::new();
            s.fail_on = Some(query.to_string());
            s
        }

        fn same_url() -> Self {
            let mut s = Self::new();
            s.url_for = |_| "https://mock.example/shared".to_string();
            s
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            self.queries_seen.lock().unwrap().push(query.to_string());
            if self.fail_on.as_deref() == Some(query) {
                return Err(SearchError::Api {
                    status: 500,
                    body: "scripted failure".into(),
                });
            }
            Ok(vec![SearchResult {
                title: format!("Mock: {query}"),
                url: (self.url_for)(query),
                content: format!("notes about {query}"),
            }])
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn summarizer_with(provider: Arc<MockLlmProvider>) -> Summarizer {
        Summarizer::new(FallbackChat::with_candidates(
            provider,
            vec!["model-a".to_string()],
        ))
    }

    #[tokio::test]
    async fn test_offline_round_produces_four_sources_and_offline_brief() {
        // No credentials anywhere: heuristic expansion plus a summarizer
        // whose provider always fails.
        let llm = Arc::new(MockLlmProvider::new());
        llm.queue_failure(LlmError::Connection {
            message: "offline".into(),
        });
        let search = Arc::new(ScriptedSearch::new());
        let engine = ResearchEngine::new(
            QueryExpander::heuristic(),
            search.clone(),
            summarizer_with(llm),
        );

        let report = engine.run("Acme Corp").await.unwrap();
        assert_eq!(search.queries_seen.lock().unwrap().len(), 4);
        assert_eq!(report.sources.len(), 4);
        assert!(report.sources.iter().all(|s| s.url.contains("mock.example")));
        assert_eq!(report.executive_brief, OFFLINE_BRIEF);

        let text = report.render();
        assert!(text.starts_with("# Deep Research: Acme Corp"));
        assert!(text.contains("## Sources"));
    }

    #[tokio::test]
    async fn test_duplicate_urls_across_sub_queries_collapse() {
        let llm = Arc::new(MockLlmProvider::new());
        llm.queue_response(MockLlmProvider::text_response("brief"));
        let engine = ResearchEngine::new(
            QueryExpander::heuristic(),
            Arc::new(ScriptedSearch::same_url()),
            summarizer_with(llm),
        );

        let report = engine.run("Acme Corp").await.unwrap();
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.sources[0].url, "https://mock.example/shared");
        // First-seen title wins.
        assert_eq!(report.sources[0].title, "Mock: Acme Corp");
    }

    #[tokio::test]
    async fn test_single_search_failure_aborts_round() {
        let llm = Arc::new(MockLlmProvider::new());
        let engine = ResearchEngine::new(
            QueryExpander::heuristic(),
            Arc::new(ScriptedSearch::failing_on("Acme Corp market size and trends")),
            summarizer_with(llm),
        );

        let result = engine.research("Acme Corp").await;
        assert!(matches!(result, Err(SearchError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_successful_synthesis_becomes_brief() {
        let llm = Arc::new(MockLlmProvider::new());
        llm.queue_response(MockLlmProvider::text_response("A useful brief."));
        let engine = ResearchEngine::new(
            QueryExpander::heuristic(),
            Arc::new(ScriptedSearch::new()),
            summarizer_with(llm),
        );

        let report = engine.run("Acme Corp").await.unwrap();
        assert_eq!(report.executive_brief, "A useful brief.");
    }
}
