//! Process-wide application state.
//!
//! One explicitly constructed context object holds every shared connection:
//! the aggregator (project registry + history store) and the credential
//! store. It is built once before the listener binds and shared read-only
//! via `Arc`, so there is no lazy cold-start race.

use crate::config::Config;
use anyhow::Context;
use herdgate_rtdb::{Aggregator, ProjectRegistry};
use herdgate_store::{CredentialStore, HistoryStore, SecretBox, StoreError};
use herdgate_types::NewCredential;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AppState {
    pub config: Config,
    pub aggregator: Aggregator,
    pub credentials: CredentialStore,
}

impl AppState {
    /// Builds the full state from the environment: opens both stores, seeds
    /// credentials from the optional projects file, and populates the
    /// project registry from active credentials. An empty registry is fine;
    /// aggregation over zero projects returns empty results.
    pub async fn init() -> anyhow::Result<Arc<Self>> {
        let config = Config::load();
        Self::init_with_config(config).await
    }

    pub async fn init_with_config(config: Config) -> anyhow::Result<Arc<Self>> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

        let secrets = SecretBox::from_base64_key(&config.encryption_key)
            .context("HERDGATE_ENCRYPTION_KEY is not a base64-encoded 32-byte key")?;

        let credentials =
            CredentialStore::open(&config.data_dir.join("credentials.duckdb"), secrets)
                .context("opening credential store")?;
        let history = HistoryStore::open(&config.data_dir.join("history.duckdb"))
            .context("opening history store")?;

        if let Some(path) = &config.projects_file {
            seed_credentials(&credentials, path)?;
        }

        let mut registry = ProjectRegistry::new();
        registry.populate(&credentials.list_active_decrypted()?);
        info!("project registry populated with {} projects", registry.len());
        if registry.is_empty() {
            warn!("no active projects configured; aggregation will return empty results");
        }

        Ok(Arc::new(Self {
            config,
            aggregator: Aggregator::new(Arc::new(registry), history),
            credentials,
        }))
    }
}

/// Seeds the credential store from a static JSON file (an array of
/// credential records). Already-registered project ids are left untouched.
fn seed_credentials(store: &CredentialStore, path: &std::path::Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading projects file {}", path.display()))?;
    let seeds: Vec<NewCredential> =
        serde_json::from_str(&raw).context("projects file is not a credential array")?;

    for seed in &seeds {
        match store.insert(seed) {
            Ok(_) => info!("seeded credentials for project {}", seed.project_id),
            Err(StoreError::Conflict(_)) => {
                debug!("project {} already in store, skipping seed", seed.project_id)
            }
            Err(e) => return Err(e).context("seeding credential store"),
        }
    }
    Ok(())
}
