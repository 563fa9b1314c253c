//! Store configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::db::{DbError, DbResult};

/// Environment variable naming the database file.
pub const ENV_DB_PATH: &str = "CLINIC_DB_PATH";
/// Environment variable overriding the busy timeout in milliseconds.
pub const ENV_BUSY_TIMEOUT_MS: &str = "CLINIC_DB_BUSY_TIMEOUT_MS";

/// How to open the clinic store.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file; `None` opens a private in-memory store
    pub path: Option<PathBuf>,
    /// How long a writer waits on another connection's lock before failing
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// File-backed config with defaults for everything else.
    pub fn at_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Build from `CLINIC_DB_PATH` / `CLINIC_DB_BUSY_TIMEOUT_MS`.
    pub fn from_env() -> DbResult<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            if !path.is_empty() {
                config.path = Some(PathBuf::from(path));
            }
        }
        if let Ok(raw) = std::env::var(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw.parse().map_err(|_| {
                DbError::Config(format!("{} must be an integer, got {:?}", ENV_BUSY_TIMEOUT_MS, raw))
            })?;
        }
        Ok(config)
    }

    /// Load a JSON config file. Missing keys fall back to defaults; unknown
    /// keys are an error.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Parse a JSON config document.
    pub fn from_json_str(raw: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Busy timeout as a `Duration`.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
