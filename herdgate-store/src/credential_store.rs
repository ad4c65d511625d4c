//! Project credential records with the database secret encrypted at rest.
//!
//! The secret is encrypted on every write where it changes and decrypted
//! only on read access by registry population; listing endpoints get
//! [`CredentialSummary`] rows that never carry the secret.

use crate::error::{StoreError, StoreResult};
use crate::secretbox::SecretBox;
use chrono::{DateTime, Utc};
use duckdb::{Connection, params};
use herdgate_types::{CredentialSummary, CredentialUpdate, NewCredential, ProjectCredential};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Credential store backed by DuckDB.
#[derive(Clone)]
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
    secrets: SecretBox,
}

impl CredentialStore {
    /// Opens or creates a credential store at the given path.
    pub fn open(path: &Path, secrets: SecretBox) -> StoreResult<Self> {
        let conn = crate::open_duckdb(path, "128MB", 1)?;
        initialize_credential_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            secrets,
        })
    }

    /// Opens an in-memory credential store (for testing).
    pub fn open_in_memory(secrets: SecretBox) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_credential_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            secrets,
        })
    }

    /// Registers a new credential. Fails with [`StoreError::Conflict`] on a
    /// duplicate project id, leaving the existing row untouched.
    pub fn insert(&self, new: &NewCredential) -> StoreResult<CredentialSummary> {
        let secret_enc = self.secrets.encrypt(&new.secret)?;
        let now_ms = Utc::now().timestamp_millis();

        let conn = self.conn.lock().unwrap();
        let exists: i64 = conn.query_row(
            "SELECT count(*) FROM credentials WHERE project_id = ?",
            params![new.project_id],
            |row| row.get(0),
        )?;
        if exists > 0 {
            return Err(StoreError::Conflict(format!(
                "project id already exists: {}",
                new.project_id
            )));
        }

        conn.execute(
            r#"
            INSERT INTO credentials (
                project_id, project_name, secret_enc, database_url,
                is_active, created_at_ms, updated_at_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                new.project_id,
                new.project_name,
                secret_enc,
                new.database_url,
                new.is_active,
                now_ms,
                now_ms,
            ],
        )?;
        debug!("registered credentials for project {}", new.project_id);

        Ok(CredentialSummary {
            project_id: new.project_id.clone(),
            project_name: new.project_name.clone(),
            database_url: new.database_url.clone(),
            is_active: new.is_active,
            created_at: ms_to_datetime(now_ms)?,
            updated_at: ms_to_datetime(now_ms)?,
        })
    }

    /// Lists all credentials, secrets omitted, ordered by project id.
    pub fn list(&self) -> StoreResult<Vec<CredentialSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT project_id, project_name, database_url, is_active, created_at_ms, updated_at_ms \
             FROM credentials ORDER BY project_id",
        )?;
        let rows = stmt
            .query_map([], row_to_summary_raw)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(raw_to_summary).collect()
    }

    /// Reads one credential with the secret decrypted. Used only by
    /// registry population; never exposed over HTTP.
    pub fn get_decrypted(&self, project_id: &str) -> StoreResult<Option<ProjectCredential>> {
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            "SELECT project_id, project_name, secret_enc, database_url, is_active, created_at_ms, updated_at_ms \
             FROM credentials WHERE project_id = ?",
            params![project_id],
            row_to_credential_raw,
        );
        match row {
            Ok(raw) => Ok(Some(self.raw_to_credential(raw)?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All active credentials with secrets decrypted, for startup registry
    /// population.
    pub fn list_active_decrypted(&self) -> StoreResult<Vec<ProjectCredential>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT project_id, project_name, secret_enc, database_url, is_active, created_at_ms, updated_at_ms \
             FROM credentials WHERE is_active ORDER BY project_id",
        )?;
        let raws = stmt
            .query_map([], row_to_credential_raw)?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(conn);
        raws.into_iter()
            .map(|raw| self.raw_to_credential(raw))
            .collect()
    }

    /// Applies a partial update. The secret is re-encrypted only when the
    /// update carries a new one.
    pub fn update(
        &self,
        project_id: &str,
        changes: &CredentialUpdate,
    ) -> StoreResult<CredentialSummary> {
        let secret_enc = match &changes.secret {
            Some(secret) => Some(self.secrets.encrypt(secret)?),
            None => None,
        };
        let now_ms = Utc::now().timestamp_millis();

        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            r#"
            UPDATE credentials SET
                project_name = coalesce(?, project_name),
                secret_enc   = coalesce(?, secret_enc),
                database_url = coalesce(?, database_url),
                is_active    = coalesce(?, is_active),
                updated_at_ms = ?
            WHERE project_id = ?
            "#,
            params![
                changes.project_name,
                secret_enc,
                changes.database_url,
                changes.is_active,
                now_ms,
                project_id,
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!(
                "credentials not found: {project_id}"
            )));
        }

        let raw = conn.query_row(
            "SELECT project_id, project_name, database_url, is_active, created_at_ms, updated_at_ms \
             FROM credentials WHERE project_id = ?",
            params![project_id],
            row_to_summary_raw,
        )?;
        raw_to_summary(raw)
    }

    /// Deletes a credential record.
    pub fn delete(&self, project_id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM credentials WHERE project_id = ?",
            params![project_id],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!(
                "credentials not found: {project_id}"
            )));
        }
        Ok(())
    }

    /// Flips the active flag, returning the new value.
    pub fn toggle(&self, project_id: &str) -> StoreResult<bool> {
        let now_ms = Utc::now().timestamp_millis();
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            "UPDATE credentials SET is_active = NOT is_active, updated_at_ms = ? \
             WHERE project_id = ? RETURNING is_active",
            params![now_ms, project_id],
            |row| row.get::<_, bool>(0),
        );
        match row {
            Ok(active) => Ok(active),
            Err(duckdb::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(format!(
                "credentials not found: {project_id}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn raw_to_credential(&self, raw: CredentialRaw) -> StoreResult<ProjectCredential> {
        let (project_id, project_name, secret_enc, database_url, is_active, created, updated) = raw;
        Ok(ProjectCredential {
            secret: self.secrets.decrypt(&secret_enc)?,
            project_id,
            project_name,
            database_url,
            is_active,
            created_at: ms_to_datetime(created)?,
            updated_at: ms_to_datetime(updated)?,
        })
    }
}

type SummaryRaw = (String, String, String, bool, i64, i64);
type CredentialRaw = (String, String, String, String, bool, i64, i64);

fn row_to_summary_raw(row: &duckdb::Row<'_>) -> duckdb::Result<SummaryRaw> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn row_to_credential_raw(row: &duckdb::Row<'_>) -> duckdb::Result<CredentialRaw> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn raw_to_summary(raw: SummaryRaw) -> StoreResult<CredentialSummary> {
    let (project_id, project_name, database_url, is_active, created, updated) = raw;
    Ok(CredentialSummary {
        project_id,
        project_name,
        database_url,
        is_active,
        created_at: ms_to_datetime(created)?,
        updated_at: ms_to_datetime(updated)?,
    })
}

fn ms_to_datetime(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("bad timestamp: {ms}")))
}

fn initialize_credential_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS credentials (
            project_id VARCHAR PRIMARY KEY,
            project_name VARCHAR NOT NULL,
            secret_enc TEXT NOT NULL,
            database_url VARCHAR NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT true,
            created_at_ms BIGINT NOT NULL,
            updated_at_ms BIGINT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
