//! History log — the persisted single-step undo trail.
//!
//! Append-only; the sequence number is assigned from a database sequence at
//! append time, so `latest()` is deterministic even when two modifies land
//! in the same millisecond.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use herdgate_types::{HistoryEntry, NewHistoryEntry, RecordKind};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Persists the undoable change log.
#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    /// Opens or creates a history store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = crate::open_duckdb(path, "128MB", 1)?;
        initialize_history_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory history store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_history_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Appends an entry, returning its assigned sequence number.
    pub fn append(&self, entry: &NewHistoryEntry) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();
        let original_json = serde_json::to_string(&entry.original_value)?;
        let new_json = serde_json::to_string(&entry.new_value)?;
        let created_at_ms = Utc::now().timestamp_millis();

        let seq: i64 = conn.query_row(
            r#"
            INSERT INTO history (
                seq, project_id, data_type, data_id,
                original_json, new_json, created_at_ms
            ) VALUES (nextval('history_seq'), ?, ?, ?, ?, ?, ?)
            RETURNING seq
            "#,
            params![
                entry.project_id,
                entry.data_type.as_str(),
                entry.data_id,
                original_json,
                new_json,
                created_at_ms,
            ],
            |row| row.get(0),
        )?;
        Ok(seq)
    }

    /// Returns the most recent entry, if any. Exactly one row, highest `seq`.
    pub fn latest(&self) -> StoreResult<Option<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            "SELECT seq, project_id, data_type, data_id, original_json, new_json, created_at_ms \
             FROM history ORDER BY seq DESC LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        );

        match row {
            Ok(raw) => Ok(Some(raw_to_entry(raw)?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes an entry by sequence number. Removing an already-deleted
    /// entry is a no-op.
    pub fn remove(&self, seq: i64) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM history WHERE seq = ?", params![seq])?;
        Ok(())
    }

    /// Number of retained entries.
    pub fn len(&self) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

type RawRow = (i64, String, String, String, String, String, i64);

fn raw_to_entry(raw: RawRow) -> StoreResult<HistoryEntry> {
    let (seq, project_id, data_type, data_id, original_json, new_json, created_at_ms) = raw;
    let data_type: RecordKind = data_type
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("history seq {seq}: {e}")))?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(created_at_ms)
        .ok_or_else(|| StoreError::Corrupt(format!("history seq {seq}: bad timestamp")))?;

    Ok(HistoryEntry {
        seq,
        project_id,
        data_type,
        data_id,
        original_value: serde_json::from_str(&original_json)?,
        new_value: serde_json::from_str(&new_json)?,
        timestamp,
    })
}

fn initialize_history_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE SEQUENCE IF NOT EXISTS history_seq START 1;
        CREATE TABLE IF NOT EXISTS history (
            seq BIGINT PRIMARY KEY,
            project_id VARCHAR NOT NULL,
            data_type VARCHAR NOT NULL,
            data_id VARCHAR NOT NULL,
            original_json TEXT NOT NULL,
            new_json TEXT NOT NULL,
            created_at_ms BIGINT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_history_project ON history(project_id);
        "#,
    )?;
    Ok(())
}
