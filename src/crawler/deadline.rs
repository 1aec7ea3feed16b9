use crate::config::CheckpointConfig;
use std::time::{Duration, Instant};

/// Point in time at which a running crawl must checkpoint
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires
    pub fn none() -> Self {
        Self { at: None }
    }

    /// Expires `duration` from now
    pub fn after(duration: Duration) -> Self {
        Self {
            at: Some(Instant::now() + duration),
        }
    }

    /// Budget minus safety margin, starting now; no deadline when the budget is 0
    pub fn from_config(config: &CheckpointConfig) -> Self {
        if config.execution_budget_secs == 0 {
            return Self::none();
        }

        let usable = config
            .execution_budget_secs
            .saturating_sub(config.safety_margin_secs);
        Self::after(Duration::from_secs(usable))
    }

    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
