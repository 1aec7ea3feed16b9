//! Storage module for persisting crawl checkpoints
//!
//! This module handles saving and restoring in-progress crawl state:
//! - SQLite database initialization and schema management
//! - Snapshot persistence keyed by session name
//! - An in-memory store for tests and one-shot runs

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryCheckpointStore;
pub use sqlite::SqliteCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use crate::state::LinkNode;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Opens a checkpoint store
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file, or `None` for an in-memory store
///
/// # Returns
///
/// * `Ok(Box<dyn CheckpointStore>)` - Store ready for use
/// * `Err(StorageError)` - Failed to open the database
pub fn open_store(path: Option<&Path>) -> StorageResult<Box<dyn CheckpointStore>> {
    match path {
        Some(path) => Ok(Box::new(SqliteCheckpointStore::new(path)?)),
        None => Ok(Box::new(MemoryCheckpointStore::new())),
    }
}

/// Persisted progress of an interrupted crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSnapshot {
    /// Pending URLs, head first
    pub queue: Vec<String>,

    /// Every discovered URL with its counters, in discovery order
    pub nodes: Vec<(String, LinkNode)>,

    /// Number of visits already performed
    pub visited: u64,

    /// Hash of the configuration the snapshot was taken under
    pub config_hash: Option<String>,

    pub saved_at: Option<DateTime<Utc>>,
}

impl CheckpointSnapshot {
    /// Stamps the snapshot with the configuration hash and the current time
    pub fn stamped(mut self, config_hash: Option<&str>) -> Self {
        self.config_hash = config_hash.map(str::to_string);
        self.saved_at = Some(Utc::now());
        self
    }
}
