//! Database schema definitions for the checkpoint store

/// SQL schema for the checkpoint database
///
/// Header columns are nullable so an interrupted write can be recognised as
/// partial instead of failing the read.
pub const SCHEMA_SQL: &str = r#"
-- One pending snapshot per session
CREATE TABLE IF NOT EXISTS checkpoints (
    session TEXT PRIMARY KEY,
    visited INTEGER,
    queue_len INTEGER,
    node_count INTEGER,
    config_hash TEXT,
    saved_at TEXT
);

-- Work queue, in dequeue order
CREATE TABLE IF NOT EXISTS checkpoint_queue (
    session TEXT NOT NULL,
    position INTEGER NOT NULL,
    url TEXT NOT NULL,
    PRIMARY KEY (session, position)
);

-- Link counters per discovered URL
CREATE TABLE IF NOT EXISTS checkpoint_nodes (
    session TEXT NOT NULL,
    url TEXT NOT NULL,
    incoming INTEGER NOT NULL,
    outgoing INTEGER NOT NULL,
    seq INTEGER NOT NULL,
    PRIMARY KEY (session, url)
);

CREATE INDEX IF NOT EXISTS idx_checkpoint_nodes_seq ON checkpoint_nodes(session, seq);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
