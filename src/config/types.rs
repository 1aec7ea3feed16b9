use serde::Deserialize;

/// Main configuration structure for Sitemap-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub additional: Vec<AdditionalEntry>,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ping: Option<PingConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root address of the crawl; defines the host boundary
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum number of pages to visit (0 = unlimited)
    #[serde(rename = "visit-limit", default)]
    pub visit_limit: u64,

    /// Whether same-host addresses containing `?` are crawled
    #[serde(rename = "allow-query", default)]
    pub allow_query: bool,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Basic auth user name
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Path fragment categories
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Paths that are never crawled
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Paths that always get priority 1
    #[serde(default)]
    pub primary: Vec<String>,

    /// Paths that get at least priority 0.5
    #[serde(default)]
    pub normal: Vec<String>,

    /// Paths that always get priority 0
    #[serde(default)]
    pub secondary: Vec<String>,
}

/// A page that is not linked from the site but belongs in the sitemap
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalEntry {
    pub url: String,
    pub priority: f64,
}

/// How the process continues after a deadline checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeMode {
    /// Sleep for the restart delay and resume in the same process
    Sleep,
    /// Exit and let an external supervisor re-invoke the crawler
    Exit,
}

/// Checkpoint and execution budget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointConfig {
    /// Path to the SQLite checkpoint database; in-memory when absent
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Key under which the pending snapshot is stored
    #[serde(rename = "session-name", default = "default_session_name")]
    pub session_name: String,

    /// Wall-clock budget of one execution cycle in seconds (0 = no deadline)
    #[serde(rename = "execution-budget-secs", default)]
    pub execution_budget_secs: u64,

    /// Seconds before the budget runs out at which the crawl checkpoints
    #[serde(rename = "safety-margin-secs", default = "default_safety_margin_secs")]
    pub safety_margin_secs: u64,

    /// Seconds to wait before the next execution cycle
    #[serde(rename = "restart-delay-secs", default = "default_restart_delay_secs")]
    pub restart_delay_secs: u64,

    #[serde(rename = "resume-mode", default = "default_resume_mode")]
    pub resume_mode: ResumeMode,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated sitemap XML file
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,
}

/// Search engine notification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PingConfig {
    /// Public address of the generated sitemap, substituted into each template
    #[serde(rename = "sitemap-url")]
    pub sitemap_url: String,

    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Endpoint templates containing the placeholder
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            session_name: default_session_name(),
            execution_budget_secs: 0,
            safety_margin_secs: default_safety_margin_secs(),
            restart_delay_secs: default_restart_delay_secs(),
            resume_mode: default_resume_mode(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: default_sitemap_path(),
        }
    }
}

fn default_user_agent() -> String {
    format!("sitemap-ripple/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_session_name() -> String {
    crate::crawler::DEFAULT_SESSION.to_string()
}

fn default_safety_margin_secs() -> u64 {
    5
}

fn default_restart_delay_secs() -> u64 {
    5
}

fn default_resume_mode() -> ResumeMode {
    ResumeMode::Sleep
}

fn default_sitemap_path() -> String {
    "./sitemap.xml".to_string()
}

fn default_placeholder() -> String {
    "{path}".to_string()
}
