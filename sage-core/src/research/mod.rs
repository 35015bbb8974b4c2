//! Deep research pipeline.
//!
//! Orchestrates a multi-step research flow:
//! 1. **Expand** — decompose the prompt into focused sub-queries
//! 2. **Search** — run all sub-query searches concurrently
//! 3. **Assemble** — concatenate findings into a research packet and
//!    deduplicate sources by URL in first-seen order
//! 4. **Synthesize** — summarize the packet into an executive brief
//! 5. **Report** — compose the final formatted text

pub mod engine;
pub mod expansion;
pub mod report;
pub mod sources;

pub use engine::ResearchEngine;
pub use expansion::QueryExpander;
pub use report::ResearchReport;
pub use sources::{SourceList, SourceRef};
