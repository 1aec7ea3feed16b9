//! SQLite checkpoint store
//!
//! A snapshot is written as a header row in `checkpoints` plus its queue and
//! node rows, all inside one transaction.

use crate::state::LinkNode;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use crate::storage::CheckpointSnapshot;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite checkpoint backend
pub struct SqliteCheckpointStore {
    conn: Connection,
}

/// Header row as read back, before completeness checks
struct HeaderRow {
    visited: Option<i64>,
    queue_len: Option<i64>,
    node_count: Option<i64>,
    config_hash: Option<String>,
    saved_at: Option<String>,
}

impl SqliteCheckpointStore {
    /// Opens or creates the checkpoint database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCheckpointStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_header(&self, key: &str) -> StorageResult<Option<HeaderRow>> {
        let header = self
            .conn
            .query_row(
                "SELECT visited, queue_len, node_count, config_hash, saved_at
                 FROM checkpoints WHERE session = ?1",
                params![key],
                |row| {
                    Ok(HeaderRow {
                        visited: row.get(0)?,
                        queue_len: row.get(1)?,
                        node_count: row.get(2)?,
                        config_hash: row.get(3)?,
                        saved_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(header)
    }

    fn load_queue(&self, key: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT url FROM checkpoint_queue WHERE session = ?1 ORDER BY position ASC",
        )?;

        let queue = stmt
            .query_map(params![key], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(queue)
    }

    fn load_nodes(&self, key: &str) -> StorageResult<Vec<(String, LinkNode)>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, incoming, outgoing, seq FROM checkpoint_nodes
             WHERE session = ?1 ORDER BY seq ASC",
        )?;

        let rows = stmt
            .query_map(params![key], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(url, incoming, outgoing, seq)| {
                let node = LinkNode {
                    incoming: to_count(incoming, "incoming")?,
                    outgoing: to_count(outgoing, "outgoing")?,
                    seq: to_count(seq, "seq")?,
                };
                Ok((url, node))
            })
            .collect()
    }
}

impl CheckpointStore for SqliteCheckpointStore {
    fn fetch(&self, key: &str) -> StorageResult<Option<CheckpointSnapshot>> {
        let Some(header) = self.load_header(key)? else {
            return Ok(None);
        };

        let (Some(visited), Some(queue_len), Some(node_count)) =
            (header.visited, header.queue_len, header.node_count)
        else {
            tracing::warn!(session = key, "Checkpoint header incomplete, ignoring");
            return Ok(None);
        };

        let queue = self.load_queue(key)?;
        let nodes = self.load_nodes(key)?;

        if queue.len() as i64 != queue_len || nodes.len() as i64 != node_count {
            tracing::warn!(
                session = key,
                expected_queue = queue_len,
                found_queue = queue.len(),
                expected_nodes = node_count,
                found_nodes = nodes.len(),
                "Checkpoint is partial, ignoring"
            );
            return Ok(None);
        }

        let saved_at = header.saved_at.as_deref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        });

        Ok(Some(CheckpointSnapshot {
            queue,
            nodes,
            visited: to_count(visited, "visited")?,
            config_hash: header.config_hash,
            saved_at,
        }))
    }

    fn store(&mut self, key: &str, snapshot: &CheckpointSnapshot) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM checkpoints WHERE session = ?1", params![key])?;
        tx.execute(
            "DELETE FROM checkpoint_queue WHERE session = ?1",
            params![key],
        )?;
        tx.execute(
            "DELETE FROM checkpoint_nodes WHERE session = ?1",
            params![key],
        )?;

        tx.execute(
            "INSERT INTO checkpoints (session, visited, queue_len, node_count, config_hash, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key,
                snapshot.visited as i64,
                snapshot.queue.len() as i64,
                snapshot.nodes.len() as i64,
                snapshot.config_hash,
                snapshot.saved_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;

        {
            let mut insert_queue = tx.prepare(
                "INSERT INTO checkpoint_queue (session, position, url) VALUES (?1, ?2, ?3)",
            )?;
            for (position, url) in snapshot.queue.iter().enumerate() {
                insert_queue.execute(params![key, position as i64, url])?;
            }

            let mut insert_node = tx.prepare(
                "INSERT INTO checkpoint_nodes (session, url, incoming, outgoing, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (url, node) in &snapshot.nodes {
                insert_node.execute(params![
                    key,
                    url,
                    node.incoming as i64,
                    node.outgoing as i64,
                    node.seq as i64,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM checkpoints WHERE session = ?1", params![key])?;
        tx.execute(
            "DELETE FROM checkpoint_queue WHERE session = ?1",
            params![key],
        )?;
        tx.execute(
            "DELETE FROM checkpoint_nodes WHERE session = ?1",
            params![key],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn to_count(value: i64, column: &str) -> StorageResult<u64> {
    u64::try_from(value)
        .map_err(|_| StorageError::InvalidRecord(format!("negative {}: {}", column, value)))
}
