//! Project registry — the set of configured external connections.
//!
//! Populated once at startup from the credential store (or a static seed
//! file) before the first request is served, then shared read-only. The
//! registration policy is first-registration-wins: re-registering a project
//! id is a no-op.

use crate::client::RtdbClient;
use herdgate_types::ProjectCredential;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Registered project connections, iterated in project-id order so fan-out
/// results are deterministic.
pub struct ProjectRegistry {
    http: reqwest::Client,
    projects: BTreeMap<String, RtdbClient>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            projects: BTreeMap::new(),
        }
    }

    /// Registers a connection for one credential record. Inactive
    /// credentials are skipped; a project id that is already registered is
    /// left untouched. Returns whether a connection was added.
    pub fn register(&mut self, credential: &ProjectCredential) -> bool {
        if !credential.is_active {
            debug!(
                "skipping inactive project {}",
                credential.project_id
            );
            return false;
        }
        if self.projects.contains_key(&credential.project_id) {
            debug!(
                "project {} already registered, keeping existing connection",
                credential.project_id
            );
            return false;
        }
        let client = RtdbClient::new(self.http.clone(), credential);
        self.projects.insert(credential.project_id.clone(), client);
        info!("registered project {}", credential.project_id);
        true
    }

    /// Registers every credential in the slice. Idempotent.
    pub fn populate(&mut self, credentials: &[ProjectCredential]) {
        for credential in credentials {
            self.register(credential);
        }
    }

    pub fn get(&self, project_id: &str) -> Option<&RtdbClient> {
        self.projects.get(project_id)
    }

    /// All registered connections in project-id order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &RtdbClient)> {
        self.projects.iter().map(|(id, c)| (id.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
