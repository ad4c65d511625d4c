//! REST client for one external realtime-database project.
//!
//! The external store exposes each path as `{database_url}/{path}.json`;
//! GET reads, PATCH merge-patches (absent fields preserved), PUT replaces.
//! The database secret rides along as the `auth` query parameter, so error
//! messages are built without the request URL to keep it out of logs.

use crate::error::{RtdbError, RtdbResult};
use herdgate_types::ProjectCredential;
use serde_json::Value;
use tracing::debug;

/// Connection handle for one registered project.
#[derive(Clone)]
pub struct RtdbClient {
    http: reqwest::Client,
    project_id: String,
    base_url: String,
    secret: String,
}

impl RtdbClient {
    pub fn new(http: reqwest::Client, credential: &ProjectCredential) -> Self {
        Self {
            http,
            project_id: credential.project_id.clone(),
            base_url: credential.database_url.trim_end_matches('/').to_string(),
            secret: credential.secret.clone(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Reads the value at a path. JSON `null` means the path does not exist.
    pub async fn fetch(&self, path: &str) -> RtdbResult<Option<Value>> {
        debug!("GET {path} on project {}", self.project_id);
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let resp = self.check_status(resp)?;

        let value: Value = resp.json().await.map_err(|e| self.transport_error(e))?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    /// Merge-patches a path: fields absent from `value` are preserved.
    pub async fn merge(&self, path: &str, value: &Value) -> RtdbResult<()> {
        debug!("PATCH {path} on project {}", self.project_id);
        let resp = self
            .http
            .patch(self.url(path))
            .json(value)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_status(resp)?;
        Ok(())
    }

    /// Replaces the value at a path entirely.
    pub async fn replace(&self, path: &str, value: &Value) -> RtdbResult<()> {
        debug!("PUT {path} on project {}", self.project_id);
        let resp = self
            .http
            .put(self.url(path))
            .json(value)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_status(resp)?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}.json?auth={}", self.base_url, self.secret)
    }

    fn check_status(&self, resp: reqwest::Response) -> RtdbResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(RtdbError::Upstream(format!(
                "project {} responded {status}",
                self.project_id
            )))
        }
    }

    /// Strips the URL from transport errors so the auth secret never
    /// reaches logs or responses.
    fn transport_error(&self, err: reqwest::Error) -> RtdbError {
        RtdbError::Upstream(format!("project {}: {}", self.project_id, err.without_url()))
    }
}
