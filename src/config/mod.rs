//! Configuration module for Sitemap-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AdditionalEntry, CheckpointConfig, Config, CrawlerConfig, OutputConfig, PathsConfig,
    PingConfig, ResumeMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
