//! Credential records describing which external projects to connect to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decrypted connection material for one external project. Only ever built
/// by the credential store on read access; the secret never crosses the
/// HTTP boundary.
#[derive(Clone, Debug)]
pub struct ProjectCredential {
    pub project_id: String,
    pub project_name: String,
    /// Database secret used to authenticate REST calls. Stored encrypted.
    pub secret: String,
    pub database_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response shape for credential listings — the secret is omitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub project_id: String,
    pub project_name: String,
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a new project credential.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub project_id: String,
    pub project_name: String,
    pub secret: String,
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update for an existing credential. `None` fields are left as-is;
/// a new secret is re-encrypted on write.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdate {
    pub project_name: Option<String>,
    pub secret: Option<String>,
    #[serde(rename = "databaseURL")]
    pub database_url: Option<String>,
    pub is_active: Option<bool>,
}
