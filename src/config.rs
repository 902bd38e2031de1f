//! Configuration for kvdb
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming an override directory for export temp files
pub const TEMP_DIR_ENV: &str = "KVDB_TMPDIR";

/// Default number of shards in a database's map
pub const DEFAULT_SHARD_COUNT: usize = 20;

/// Default permission bits for exported files
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Configuration for a Database instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Map Configuration
    // -------------------------------------------------------------------------
    /// Number of independently locked shards (fixed for the map's lifetime)
    pub shard_count: usize,

    // -------------------------------------------------------------------------
    // Export Configuration
    // -------------------------------------------------------------------------
    /// Directory for temporary files during export.
    ///
    /// `None` uses the target file's own directory, as does an override that
    /// is missing or sits on a different filesystem than the target.
    pub temp_dir: Option<PathBuf>,

    /// Permission bits applied to exported files (Unix only)
    pub file_mode: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            temp_dir: None,
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Defaults, with the temp directory taken from `KVDB_TMPDIR` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(TEMP_DIR_ENV).filter(|d| !d.is_empty()) {
            config.temp_dir = Some(PathBuf::from(dir));
        }
        config
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the shard count (clamped to at least 1)
    pub fn shard_count(mut self, count: usize) -> Self {
        self.config.shard_count = count.max(1);
        self
    }

    /// Set the temp directory used during export
    pub fn temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(path.into());
        self
    }

    /// Set the permission bits for exported files
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
