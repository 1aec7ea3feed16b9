//! URL handling module for Sitemap-Ripple
//!
//! This module provides the crawl target and its host scope, path fragment
//! matching, link resolution against the root, and the validator that
//! decides which discovered links belong to the crawl.

mod matcher;
mod normalize;
mod target;
mod validator;

// Re-export main types and functions
pub use matcher::{PathCategory, PathMatcher, PathRules};
pub use normalize::{has_scheme, resolve_link};
pub use target::CrawlTarget;
pub use validator::{Rejection, UrlValidator};
