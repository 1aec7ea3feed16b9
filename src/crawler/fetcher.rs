//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeout
//! - Optional basic authentication
//! - GET requests without following redirects
//! - Recognising HTML responses from the raw response head

use crate::config::CrawlerConfig;
use regex::Regex;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

/// A `Content-Type` header naming an HTML media type
static HTML_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^content-type:[^\r\n]*/[^\r\n]*html").expect("content type pattern is valid")
});

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// A response arrived, whatever its status
    Page {
        /// HTTP status code
        status: u16,
        /// Status line and headers, one per line
        raw_head: String,
        /// Response body; empty for non-HTML responses
        body: String,
    },

    /// Transport failure (connection refused, timeout, TLS error, ...)
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the response head declares an HTML content type
    pub fn is_html(&self) -> bool {
        match self {
            Self::Page { raw_head, .. } => HTML_CONTENT_TYPE.is_match(raw_head),
            Self::Failed { .. } => false,
        }
    }
}

/// Source of pages for the crawl engine
pub trait Fetcher {
    /// Fetches `url` with a single GET request
    ///
    /// Failures are reported as `FetchResult::Failed`, never as errors, so one
    /// unreachable page cannot end a crawl.
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    credentials: Option<(String, String)>,
}

impl HttpFetcher {
    /// Builds an HTTP fetcher from the crawler configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Successfully built HTTP client
    /// * `Err(reqwest::Error)` - Failed to build client
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            credentials,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let mut request = self.client.get(url);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchResult::Failed {
                    error: e.to_string(),
                }
            }
        };

        let status = response.status();
        let mut raw_head = format!("{:?} {}\r\n", response.version(), status);
        for (name, value) in response.headers() {
            raw_head.push_str(name.as_str());
            raw_head.push_str(": ");
            raw_head.push_str(&String::from_utf8_lossy(value.as_bytes()));
            raw_head.push_str("\r\n");
        }

        let is_html = HTML_CONTENT_TYPE.is_match(&raw_head);
        let body = if is_html {
            match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    return FetchResult::Failed {
                        error: e.to_string(),
                    }
                }
            }
        } else {
            String::new()
        };

        FetchResult::Page {
            status: status.as_u16(),
            raw_head,
            body,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed; a redirecting page counts as visited and
/// contributes no links. Compressed bodies are decoded transparently.
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .redirect(Policy::none())
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .build()
}
