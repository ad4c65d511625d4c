//! Environment-driven server configuration.

use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::PathBuf;
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

/// Development-only fallback key; real deployments must set
/// `HERDGATE_ENCRYPTION_KEY` to base64 of 32 random bytes.
const DEV_KEY_MATERIAL: &[u8; 32] = b"herdgate-dev-key-do-not-use-prod";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Reported by `/health`; defaults to "development".
    pub environment: String,
    /// Directory holding the history and credential databases.
    pub data_dir: PathBuf,
    /// Base64-encoded 32-byte key for credential encryption at rest.
    pub encryption_key: String,
    /// Optional JSON file of credentials to seed the store with at startup.
    pub projects_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3000"),
            environment: try_load("HERDGATE_ENV", "development"),
            data_dir: PathBuf::from(try_load::<String>("HERDGATE_DATA_DIR", "./data")),
            encryption_key: load_encryption_key(),
            projects_file: env::var("HERDGATE_PROJECTS_FILE").ok().map(PathBuf::from),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_encryption_key() -> String {
    env::var("HERDGATE_ENCRYPTION_KEY").unwrap_or_else(|_| {
        warn!("HERDGATE_ENCRYPTION_KEY not set, using development key");
        STANDARD.encode(DEV_KEY_MATERIAL)
    })
}
