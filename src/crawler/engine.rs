//! Crawl engine - main crawl loop
//!
//! The engine owns the crawl state for one execution cycle:
//! - Seeding the queue with the root, or restoring a pending checkpoint
//! - Fetching pages one at a time in queue order
//! - Recording every in-scope link found on a page
//! - Checkpointing when the deadline arrives, clearing the checkpoint on completion

use crate::config::Config;
use crate::crawler::{extract_links, Deadline, FetchResult, Fetcher};
use crate::state::{CompletedCrawl, CrawlState, EngineState, RecordOutcome};
use crate::storage::CheckpointStore;
use crate::url::{resolve_link, CrawlTarget, PathRules, UrlValidator};
use crate::Result;
use std::time::Duration;

/// Default key under which snapshots are stored
pub const DEFAULT_SESSION: &str = "SitemapCache";

/// How a call to [`Engine::run`] ended
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The queue drained or the visit limit was reached
    Completed(CompletedCrawl),

    /// The deadline arrived; progress is in the checkpoint store
    Checkpointed {
        /// Visits performed so far, across all cycles
        visited: u64,
        /// How long to wait before starting the next cycle
        resume_after: Duration,
    },
}

/// Sequential single-site crawler
pub struct Engine<F, S> {
    validator: UrlValidator,
    fetcher: F,
    store: S,
    visit_limit: u64,
    session: String,
    deadline: Deadline,
    restart_delay: Duration,
    config_hash: Option<String>,
    state: EngineState,
}

impl<F: Fetcher, S: CheckpointStore> Engine<F, S> {
    /// Creates an engine with no visit limit, no deadline and the default session
    pub fn new(validator: UrlValidator, fetcher: F, store: S) -> Self {
        Self {
            validator,
            fetcher,
            store,
            visit_limit: 0,
            session: DEFAULT_SESSION.to_string(),
            deadline: Deadline::none(),
            restart_delay: Duration::from_secs(5),
            config_hash: None,
            state: EngineState::Idle,
        }
    }

    /// Creates an engine from a validated configuration
    ///
    /// The deadline starts counting when this is called.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Page source
    /// * `store` - Checkpoint backend
    ///
    /// # Returns
    ///
    /// * `Ok(Engine)` - Engine ready to run
    /// * `Err(SitemapError)` - The root URL is invalid
    pub fn from_config(config: &Config, fetcher: F, store: S) -> Result<Self> {
        let target = CrawlTarget::new(&config.crawler.root_url)?;
        let rules = PathRules::compile(&config.paths);
        let validator = UrlValidator::new(target, rules, config.crawler.allow_query);

        Ok(Self::new(validator, fetcher, store)
            .with_visit_limit(config.crawler.visit_limit)
            .with_session(&config.checkpoint.session_name)
            .with_deadline(Deadline::from_config(&config.checkpoint))
            .with_restart_delay(Duration::from_secs(config.checkpoint.restart_delay_secs)))
    }

    /// Maximum number of visits (0 = unlimited)
    pub fn with_visit_limit(mut self, limit: u64) -> Self {
        self.visit_limit = limit;
        self
    }

    pub fn with_session(mut self, session: &str) -> Self {
        self.session = session.to_string();
        self
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Stamps checkpoints with `hash` and warns when a resumed one differs
    pub fn with_config_hash(mut self, hash: &str) -> Self {
        self.config_hash = Some(hash.to_string());
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the crawl until it completes or the deadline arrives
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome::Completed)` - Final counters, checkpoint removed
    /// * `Ok(CrawlOutcome::Checkpointed)` - Snapshot persisted for the next cycle
    /// * `Err(SitemapError)` - The checkpoint store failed, or the engine already ran
    pub async fn run(&mut self) -> Result<CrawlOutcome> {
        self.state = self.state.transition(EngineState::Running)?;

        let mut crawl = CrawlState::new(self.validator.clone());
        self.resume(&mut crawl)?;

        tracing::info!(
            "Crawling {} ({} queued, {} visited)",
            self.validator.target().root(),
            crawl.queue_len(),
            crawl.visited()
        );

        loop {
            if self.deadline.is_expired() {
                return self.checkpoint(&crawl);
            }

            if self.visit_limit > 0 && crawl.visited() >= self.visit_limit {
                tracing::info!("Visit limit of {} reached", self.visit_limit);
                break;
            }

            let Some((counter, url)) = crawl.begin_visit() else {
                break;
            };

            tracing::info!(target: "progress", "{}\t{}", counter, url);

            for link in self.page_links(&url).await {
                let resolved = resolve_link(self.validator.target(), &link);
                match crawl.record(&url, &resolved) {
                    RecordOutcome::Rejected(reason) => {
                        tracing::trace!("Skipping {} ({})", resolved, reason);
                    }
                    RecordOutcome::Counted => {}
                    RecordOutcome::Enqueued => {
                        tracing::debug!("Discovered {}", resolved);
                    }
                }
            }
        }

        self.store.delete(&self.session)?;
        self.state = self.state.transition(EngineState::Completed)?;

        tracing::info!(
            "Crawl completed - {} nodes visited, {} nodes found",
            crawl.visited(),
            crawl.node_count()
        );

        Ok(CrawlOutcome::Completed(crawl.finish()))
    }

    fn resume(&self, crawl: &mut CrawlState) -> Result<()> {
        let Some(snapshot) = self.store.fetch(&self.session)? else {
            return Ok(());
        };

        if let (Some(current), Some(saved)) = (&self.config_hash, &snapshot.config_hash) {
            if current != saved {
                tracing::warn!(
                    "Configuration changed since checkpoint '{}' was saved; resuming anyway",
                    self.session
                );
            }
        }

        tracing::info!(
            "Resuming session '{}' at node {} ({} queued, {} found)",
            self.session,
            snapshot.visited + 1,
            snapshot.queue.len(),
            snapshot.nodes.len()
        );

        crawl.restore(snapshot);
        Ok(())
    }

    fn checkpoint(&mut self, crawl: &CrawlState) -> Result<CrawlOutcome> {
        let snapshot = crawl.snapshot().stamped(self.config_hash.as_deref());
        self.store.store(&self.session, &snapshot)?;
        self.state = self.state.transition(EngineState::Checkpointed)?;

        tracing::info!(
            "--- Timeout - will restart at node {} in {} seconds ---",
            crawl.visited() + 1,
            self.restart_delay.as_secs()
        );

        Ok(CrawlOutcome::Checkpointed {
            visited: crawl.visited(),
            resume_after: self.restart_delay,
        })
    }

    /// Fetches `url` and returns its raw links; empty for non-HTML or failed fetches
    async fn page_links(&self, url: &str) -> Vec<String> {
        let result = self.fetcher.fetch(url).await;

        match &result {
            FetchResult::Page { body, status, .. } if result.is_html() => {
                tracing::debug!("Fetched {} (HTTP {})", url, status);
                extract_links(body)
            }
            FetchResult::Page { status, .. } => {
                tracing::debug!("Not HTML: {} (HTTP {})", url, status);
                Vec::new()
            }
            FetchResult::Failed { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                Vec::new()
            }
        }
    }
}
