//! Database Module
//!
//! The public entry point: a named, sharded in-memory map that can be
//! exported to and opened from a single snapshot file.
//!
//! ## Responsibilities
//! - Enforce the name length limit
//! - Delegate key operations to the sharded map
//! - Orchestrate export (atomic replace) and open (sequential replay)

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::map::ShardedMap;
use crate::persist::{SnapshotReader, SnapshotWriter, FILE_EXTENSION};
use crate::MAX_NAME_LEN;

/// An embedded key-value database
///
/// ## Concurrency Model
///
/// - Key operations take `&self`; share a `Database` across threads with
///   `Arc`. Each operation locks exactly one shard.
/// - `insert` checks for an existing key and writes under one exclusive
///   shard lock.
/// - `export` visits shards one at a time. Writes racing with an export may
///   or may not appear in the file.
/// - `set_name` takes `&mut self`, so a rename can never interleave with an
///   export reading the name.
#[derive(Debug)]
pub struct Database {
    /// Database configuration
    config: Config,

    /// Identifier persisted in the file header (at most 255 bytes)
    name: String,

    /// Key → value storage
    data: ShardedMap,
}

impl Database {
    /// Create an empty database with the config from the environment
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_config(name, Config::from_env())
    }

    /// Create an empty database with the given config
    pub fn with_config(name: impl Into<String>, config: Config) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        let data = ShardedMap::new(config.shard_count);

        Ok(Self { config, name, data })
    }

    /// Open a database file with the config from the environment
    pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Self> {
        Self::open_with_config(path, create_if_missing, Config::from_env())
    }

    /// Open a database file
    ///
    /// On open:
    /// 1. If the file is missing and `create_if_missing` is set, create an
    ///    empty database named after `path` and export it immediately
    /// 2. Otherwise read the header (name)
    /// 3. Replay every record with overwrite allowed, so later duplicates win
    /// 4. Stop at a clean end-of-file; any partial record is an error
    pub fn open_with_config(
        path: impl AsRef<Path>,
        create_if_missing: bool,
        config: Config,
    ) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound && create_if_missing => {
                let db = Self::with_config(path.to_string_lossy(), config)?;
                db.export(path)?;
                tracing::info!(path = %path.display(), "Created new database file");
                return Ok(db);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), "Opening database file");

        let mut reader = SnapshotReader::new(BufReader::new(file))?;
        let db = Self::with_config(reader.name(), config)?;

        let mut duplicates = 0u64;
        while let Some((key, value)) = reader.next_record()? {
            if db.data.replace(key, value).is_some() {
                duplicates += 1;
                tracing::trace!("Duplicate key in file, later record wins");
            }
        }

        tracing::info!(
            path = %path.display(),
            name = %db.name,
            records = reader.records_read(),
            duplicates,
            elapsed = ?start.elapsed(),
            "Database opened"
        );

        Ok(db)
    }

    // =========================================================================
    // Name
    // =========================================================================

    /// Get the database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the database. On `NameTooLong` the current name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Advisory file path for this database: `<name>.kvdb`
    pub fn default_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.name, FILE_EXTENSION))
    }

    // =========================================================================
    // Key Operations
    // =========================================================================

    /// Insert a value
    ///
    /// Fails with `KeyExists` when `overwrite` is false and the key is
    /// present; the stored value is left unchanged.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<Bytes>,
        overwrite: bool,
    ) -> Result<()> {
        self.data.insert(key.into(), value.into(), overwrite)
    }

    /// Get a value by key, or `KeyNotPresent`
    pub fn get(&self, key: &str) -> Result<Bytes> {
        self.data.get(key)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Delete a key. Missing keys are ignored.
    pub fn delete(&self, key: &str) {
        self.data.delete(key)
    }

    /// All keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.data.keys()
    }

    /// Owned copy of all data (per-shard point in time)
    pub fn to_raw_map(&self) -> HashMap<String, Bytes> {
        self.data.to_raw_map()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the whole database to `path`
    ///
    /// Steps:
    /// 1. Create a temp file beside `path` (or in the configured temp dir when
    ///    it shares a filesystem with `path`)
    /// 2. Write the header, then every record, one shard at a time
    /// 3. Flush, set permissions, fsync
    /// 4. Rename over `path`
    ///
    /// On failure the temp file is removed and `path` is untouched.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let start = Instant::now();

        tracing::debug!(path = %path.display(), name = %self.name, "Exporting database");

        match self.write_snapshot(path) {
            Ok((records, bytes)) => {
                tracing::info!(
                    path = %path.display(),
                    records,
                    bytes,
                    elapsed = ?start.elapsed(),
                    "Database exported"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Export failed, temp file discarded"
                );
                Err(e)
            }
        }
    }

    /// Returns (records, bytes) written
    fn write_snapshot(&self, path: &Path) -> Result<(u64, u64)> {
        let mut writer = SnapshotWriter::create(path, &self.name, &self.config)?;

        for shard in self.data.shards() {
            for (key, value) in shard.snapshot() {
                writer.add(&key, &value)?;
            }
        }

        let bytes = writer.bytes_written();
        let records = writer.finish()?;
        Ok((records, bytes))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of shards backing this database
    pub fn shard_count(&self) -> usize {
        self.data.shard_count()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.len() > MAX_NAME_LEN {
        return Err(KvError::NameTooLong { len: name.len() });
    }
    Ok(())
}
