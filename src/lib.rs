//! Sitemap-Ripple: a single-site crawler that scores pages and writes sitemaps
//!
//! This crate walks every reachable page below one root address, counts the
//! links between them, derives a priority and change frequency for each page,
//! and emits a sitemaps.org `urlset` document. Long crawls can checkpoint to a
//! SQLite store and resume in a later execution cycle.

pub mod config;
pub mod crawler;
pub mod output;
pub mod priority;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Ripple operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Checkpoint error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::EngineState,
        to: state::EngineState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Url not set")]
    MissingTarget,

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitemap-Ripple operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, Engine};
pub use priority::{ChangeFreq, Priority, ResultRecord};
pub use state::{CompletedCrawl, CrawlState, EngineState, LinkNode};
pub use url::{CrawlTarget, PathMatcher, PathRules, UrlValidator};
