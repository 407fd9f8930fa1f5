use std::fs;
use std::path::Path;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::error::HunterError;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub concurrency: usize,
}

impl RunConfig {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency }
    }

    pub fn validate(&self) -> Result<(), HunterError> {
        if self.concurrency == 0 {
            return Err(HunterError::config("concurrency must be at least 1"));
        }
        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(HunterError::config(format!(
                "concurrency {} exceeds the maximum of {}",
                self.concurrency,
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { concurrency: DEFAULT_CONCURRENCY }
    }
}

/// Firebase web config as exported from the Firebase console. Only the API key,
/// project and database matter for probing; the rest is accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub database_id: Option<String>,
}

impl FirebaseConfig {
    pub fn load(path: &Path) -> Result<Self, HunterError> {
        let raw = fs::read_to_string(path).map_err(|source| HunterError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            HunterError::Config(msg) => HunterError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, HunterError> {
        let cfg: FirebaseConfig = serde_json::from_str(raw)
            .map_err(|e| HunterError::config(format!("malformed firebase config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), HunterError> {
        if self.api_key.trim().is_empty() {
            return Err(HunterError::config("firebase config is missing `apiKey`"));
        }
        if self.project_id.trim().is_empty() {
            return Err(HunterError::config("firebase config is missing `projectId`"));
        }
        Ok(())
    }

    pub fn database(&self) -> &str {
        self.database_id
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_DATABASE)
    }
}
