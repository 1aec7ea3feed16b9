//! Search engine notification
//!
//! Each endpoint template has its placeholder replaced by the public sitemap
//! address and is requested once. Failures are reported, never fatal.

use crate::config::PingConfig;
use crate::output::OutputResult;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Outcome of notifying one endpoint
#[derive(Debug, Clone)]
pub struct PingReport {
    /// The endpoint after placeholder substitution
    pub url: String,

    /// HTTP status, or `None` when the request failed
    pub status: Option<u16>,

    /// Status line, headers and body as received, or the error message
    pub raw: String,
}

impl PingReport {
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|status| (200..300).contains(&status))
    }
}

/// Notifies endpoints of a new sitemap
#[derive(Debug, Clone)]
pub struct Pinger {
    client: Client,
    sitemap_url: String,
    placeholder: String,
    urls: Vec<String>,
}

impl Pinger {
    /// Creates a pinger for the configured endpoints
    ///
    /// # Arguments
    ///
    /// * `config` - Sitemap address, placeholder and endpoint templates
    /// * `user_agent` - User agent sent with every request
    ///
    /// # Returns
    ///
    /// * `Ok(Pinger)` - Ready to ping
    /// * `Err(OutputError)` - The HTTP client could not be built
    pub fn new(config: &PingConfig, user_agent: &str) -> OutputResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(Duration::from_secs(30))
            .redirect(Policy::none())
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            client,
            sitemap_url: config.sitemap_url.clone(),
            placeholder: config.placeholder.clone(),
            urls: config.urls.clone(),
        })
    }

    /// Endpoint templates with the sitemap address substituted
    pub fn targets(&self) -> Vec<String> {
        self.urls
            .iter()
            .map(|template| template.replace(&self.placeholder, &self.sitemap_url))
            .collect()
    }

    /// Requests every endpoint in order and logs `status<TAB>url` for each
    pub async fn ping(&self) -> Vec<PingReport> {
        let mut reports = Vec::with_capacity(self.urls.len());

        for url in self.targets() {
            let report = self.send(url).await;
            match report.status {
                Some(status) => tracing::info!("{}\t{}", status, report.url),
                None => tracing::warn!("{}\t{}", report.raw, report.url),
            }
            reports.push(report);
        }

        reports
    }

    async fn send(&self, url: String) -> PingReport {
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                return PingReport {
                    url,
                    status: None,
                    raw: e.to_string(),
                }
            }
        };

        let status = response.status();
        let mut raw = format!("{:?} {}\r\n", response.version(), status);
        for (name, value) in response.headers() {
            raw.push_str(&format!(
                "{}: {}\r\n",
                name,
                String::from_utf8_lossy(value.as_bytes())
            ));
        }
        raw.push_str("\r\n");

        match response.text().await {
            Ok(body) => raw.push_str(&body),
            Err(e) => tracing::debug!("Failed to read ping response from {}: {}", url, e),
        }

        PingReport {
            url,
            status: Some(status.as_u16()),
            raw,
        }
    }
}
