//! DuckDB persistence layer for Herdgate.
//!
//! Two stores back the service:
//! - [`HistoryStore`] — append-only log of applied changes, consulted and
//!   cleared by the single-step undo
//! - [`CredentialStore`] — project credential records with the database
//!   secret encrypted at rest via [`SecretBox`]
//!
//! Each store owns its own database file and guards the connection behind a
//! mutex; statements are short-lived so the lock is never held across I/O
//! to external systems.

mod credential_store;
mod error;
mod history_store;
mod secretbox;

pub use credential_store::CredentialStore;
pub use error::{StoreError, StoreResult};
pub use history_store::HistoryStore;
pub use secretbox::SecretBox;

/// Open a DuckDB connection with stale WAL recovery and resource limits.
///
/// If the initial open fails and a `.wal` file exists alongside the database,
/// it is removed and the open is retried once. Handles the common case where
/// an unclean shutdown leaves a WAL file that prevents reopening.
fn open_duckdb(
    path: &std::path::Path,
    memory_limit: &str,
    threads: u32,
) -> StoreResult<duckdb::Connection> {
    let conn = match duckdb::Connection::open(path) {
        Ok(c) => c,
        Err(first_err) => {
            let wal_path = path.with_extension(
                path.extension()
                    .map(|ext| format!("{}.wal", ext.to_string_lossy()))
                    .unwrap_or_else(|| "wal".to_string()),
            );
            if wal_path.exists() {
                tracing::warn!(
                    "DuckDB open failed, removing stale WAL and retrying: {}",
                    wal_path.display()
                );
                if std::fs::remove_file(&wal_path).is_ok() {
                    let c = duckdb::Connection::open(path)?;
                    apply_resource_limits(&c, memory_limit, threads)?;
                    return Ok(c);
                }
            }
            return Err(first_err.into());
        }
    };
    apply_resource_limits(&conn, memory_limit, threads)?;
    Ok(conn)
}

/// DuckDB defaults to ~80% of system RAM and all cores; cap per-database
/// usage since two databases are open in one process.
fn apply_resource_limits(
    conn: &duckdb::Connection,
    memory_limit: &str,
    threads: u32,
) -> StoreResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{}'; PRAGMA threads={};",
        memory_limit, threads
    ))?;
    Ok(())
}
