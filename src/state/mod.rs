//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `EngineState`: lifecycle of one engine run (idle, running, completed, checkpointed)
//! - `CrawlState`: work queue, link node mapping and visit counter
//! - `CompletedCrawl`: the frozen node mapping handed to the classifier

mod engine_state;
mod link_graph;

// Re-export main types
pub use engine_state::EngineState;
pub use link_graph::{CompletedCrawl, CrawlState, LinkNode, RecordOutcome};
