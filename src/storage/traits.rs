//! Checkpoint store trait and error types
//!
//! A checkpoint store holds at most one pending snapshot per session key.
//! Storing under an existing key replaces the previous snapshot.

use crate::storage::CheckpointSnapshot;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid checkpoint record: {0}")]
    InvalidRecord(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// The engine only ever talks to this trait, so a run can checkpoint to a
/// SQLite file, to memory, or to anything else keyed by session name.
pub trait CheckpointStore {
    /// Loads the snapshot stored under `key`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(snapshot))` - A complete snapshot is pending
    /// * `Ok(None)` - Nothing stored, or the stored snapshot is partial
    /// * `Err(StorageError)` - The backend failed
    fn fetch(&self, key: &str) -> StorageResult<Option<CheckpointSnapshot>>;

    /// Stores `snapshot` under `key`, replacing any previous snapshot
    fn store(&mut self, key: &str, snapshot: &CheckpointSnapshot) -> StorageResult<()>;

    /// Removes the snapshot stored under `key`; a missing key is not an error
    fn delete(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for &mut S {
    fn fetch(&self, key: &str) -> StorageResult<Option<CheckpointSnapshot>> {
        (**self).fetch(key)
    }

    fn store(&mut self, key: &str, snapshot: &CheckpointSnapshot) -> StorageResult<()> {
        (**self).store(key, snapshot)
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for Box<S> {
    fn fetch(&self, key: &str) -> StorageResult<Option<CheckpointSnapshot>> {
        (**self).fetch(key)
    }

    fn store(&mut self, key: &str, snapshot: &CheckpointSnapshot) -> StorageResult<()> {
        (**self).store(key, snapshot)
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }
}
