use crate::storage::traits::{CheckpointStore, StorageResult};
use crate::storage::CheckpointSnapshot;
use std::collections::HashMap;

/// Checkpoint store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    snapshots: HashMap<String, CheckpointSnapshot>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn fetch(&self, key: &str) -> StorageResult<Option<CheckpointSnapshot>> {
        Ok(self.snapshots.get(key).cloned())
    }

    fn store(&mut self, key: &str, snapshot: &CheckpointSnapshot) -> StorageResult<()> {
        self.snapshots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        self.snapshots.remove(key);
        Ok(())
    }
}
