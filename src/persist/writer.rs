//! Snapshot Writer
//!
//! Streams a database snapshot into a temporary file and atomically renames
//! it over the target.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::MAX_NAME_LEN;

use super::format::{chunk_len, write_chunk};
use super::NAME_LEN_SIZE;

/// Buffer size for the temporary file writer
const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Writer for a single snapshot file
///
/// Nothing touches the target path until `finish()`. Dropping the writer
/// without finishing removes the temporary file.
pub struct SnapshotWriter {
    /// Final destination of the snapshot
    target: PathBuf,
    /// Buffered temp file in the target's directory (or the override dir)
    writer: BufWriter<NamedTempFile>,
    /// Permission bits applied before the rename
    file_mode: u32,
    /// Number of records written
    record_count: u64,
    /// Bytes written so far, header included
    bytes_written: u64,
}

impl SnapshotWriter {
    /// Create the temporary file and write the header
    pub fn create(target: &Path, name: &str, config: &Config) -> Result<Self> {
        if name.len() > MAX_NAME_LEN {
            return Err(KvError::NameTooLong { len: name.len() });
        }

        let dir = temp_dir_for(target, config);
        let temp = tempfile::Builder::new()
            .prefix(".kvdb-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        tracing::debug!(
            target = %target.display(),
            temp = %temp.path().display(),
            "Snapshot temp file created"
        );

        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, temp);
        writer.write_all(&[name.len() as u8])?;
        writer.write_all(name.as_bytes())?;

        Ok(Self {
            target: target.to_path_buf(),
            writer,
            file_mode: config.file_mode,
            record_count: 0,
            bytes_written: (NAME_LEN_SIZE + name.len()) as u64,
        })
    }

    /// Append one record: key chunk then value chunk
    ///
    /// Both lengths are validated before anything is written, so a rejected
    /// record leaves no partial bytes behind.
    pub fn add(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let key_len = chunk_len(key.as_bytes())?;
        let value_len = chunk_len(value)?;

        self.bytes_written += write_chunk(&mut self.writer, key_len, key.as_bytes())?;
        self.bytes_written += write_chunk(&mut self.writer, value_len, value)?;
        self.record_count += 1;

        Ok(())
    }

    /// Number of records written so far
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush, set permissions, fsync, and rename over the target.
    ///
    /// Returns the number of records written.
    pub fn finish(self) -> Result<u64> {
        let temp = self
            .writer
            .into_inner()
            .map_err(|e| KvError::Io(e.into_error()))?;

        set_file_mode(temp.as_file(), self.file_mode)?;
        temp.as_file().sync_all()?;

        temp.persist(&self.target).map_err(|e| KvError::Io(e.error))?;

        Ok(self.record_count)
    }
}

/// Directory that will hold the temporary file
///
/// The override is used only when it exists on the same filesystem as the
/// target's directory, so the final rename cannot cross devices.
fn temp_dir_for(target: &Path, config: &Config) -> PathBuf {
    let target_dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    match &config.temp_dir {
        Some(dir) if same_filesystem(dir, &target_dir) => dir.clone(),
        Some(dir) => {
            tracing::debug!(
                temp_dir = %dir.display(),
                target_dir = %target_dir.display(),
                "Temp dir override unusable for this target, staging beside it"
            );
            target_dir
        }
        None => target_dir,
    }
}

#[cfg(unix)]
fn same_filesystem(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.is_dir() && a.dev() == b.dev(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_filesystem(a: &Path, _b: &Path) -> bool {
    a.is_dir()
}

#[cfg(unix)]
fn set_file_mode(file: &File, mode: u32) -> Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_mode(_file: &File, _mode: u32) -> Result<()> {
    Ok(())
}
