//! Configuration file for lychrel.
//!
//! The file is optional TOML. Lookup order for its path is an explicit path
//! from the caller, then `$LYCHREL_CONFIG`, then `~/.lychrel/config.toml`.
//!
//! ```toml
//! [store]
//! database = "db.sqlite"
//!
//! [scan]
//! workers = 4
//! span = 100000
//! partition = "dynamic"
//! chunk_size = 256
//! ```
//!
//! Scan values are kept as signed integers: rejecting zero or negative
//! values is the session's job, so a bad file and a bad flag fail the same way.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use lychrel_types::PartitionMode;

pub const DEFAULT_DATABASE: &str = "db.sqlite";
pub const DEFAULT_WORKERS: i64 = 1;
pub const DEFAULT_SPAN: i64 = 100_000;
pub const DEFAULT_CHUNK_SIZE: i64 = 256;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "LYCHREL_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LychrelConfig {
    pub store: Option<StoreConfig>,
    pub scan: Option<ScanConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite database. Relative paths resolve against the working directory.
    pub database: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Worker threads per session.
    pub workers: Option<i64>,
    /// Numbers per worker per session.
    pub span: Option<i64>,
    pub partition: Option<PartitionMode>,
    /// Numbers per work unit under dynamic partitioning.
    pub chunk_size: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl LychrelConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from `path`. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content)
            .map(Some)
            .map_err(|source| {
                tracing::warn!("Failed to parse config at {:?}: {}", path, source);
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn database(&self) -> PathBuf {
        self.store
            .as_ref()
            .and_then(|store| store.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    #[must_use]
    pub fn workers(&self) -> i64 {
        self.scan_value(|scan| scan.workers).unwrap_or(DEFAULT_WORKERS)
    }

    #[must_use]
    pub fn span(&self) -> i64 {
        self.scan_value(|scan| scan.span).unwrap_or(DEFAULT_SPAN)
    }

    #[must_use]
    pub fn partition(&self) -> PartitionMode {
        self.scan_value(|scan| scan.partition).unwrap_or_default()
    }

    #[must_use]
    pub fn chunk_size(&self) -> i64 {
        self.scan_value(|scan| scan.chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    fn scan_value<T>(&self, pick: impl FnOnce(&ScanConfig) -> Option<T>) -> Option<T> {
        self.scan.as_ref().and_then(pick)
    }
}

/// Default config file location: `$LYCHREL_CONFIG`, else `~/.lychrel/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".lychrel").join("config.toml"))
}
