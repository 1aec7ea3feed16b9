//! Output module for publishing crawl results
//!
//! This module handles:
//! - Writing the sitemaps.org `urlset` document
//! - Notifying search engines that the sitemap changed
//! - Summarizing the classified results

mod ping;
mod sitemap;
pub mod stats;

pub use ping::{PingReport, Pinger};
pub use sitemap::{SitemapWriter, SITEMAP_NAMESPACE};
pub use stats::SitemapStatistics;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// The writer was handed an empty result set
    #[error("No data")]
    NoData,

    #[error("Output path is empty")]
    EmptyPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
