//! Crawler module for page fetching and link accumulation
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML link extraction
//! - The execution deadline that triggers checkpoints
//! - The engine that drives one crawl cycle

mod deadline;
mod engine;
mod fetcher;
mod parser;

pub use deadline::Deadline;
pub use engine::{CrawlOutcome, Engine, DEFAULT_SESSION};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpFetcher};
pub use parser::extract_links;
