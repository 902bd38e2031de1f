//! Snapshot Reader
//!
//! Reads a snapshot file sequentially: header first, then one record at a
//! time until a clean end-of-file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bytes::Bytes;

use crate::error::Result;

use super::format::{into_string, read_bytes, read_len, read_record_len, truncated};

/// Reads records from a snapshot
pub struct SnapshotReader<R = BufReader<File>> {
    /// Underlying byte source, positioned after the last record read
    reader: R,
    /// Database name from the header
    name: String,
    /// Number of records read
    records_read: u64,
    /// Set after end-of-file or the first error
    done: bool,
}

impl SnapshotReader<BufReader<File>> {
    /// Open a snapshot file and read its header
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> SnapshotReader<R> {
    /// Wrap a byte source and read the header
    pub fn new(mut reader: R) -> Result<Self> {
        let mut name_len = [0u8; 1];
        reader
            .read_exact(&mut name_len)
            .map_err(|e| truncated(e, "name length"))?;

        let name = read_bytes(&mut reader, name_len[0] as usize, "name")?;
        let name = into_string(name, "name")?;

        Ok(Self {
            reader,
            name,
            records_read: 0,
            done: false,
        })
    }

    /// Database name stored in the header
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records read so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record.
    ///
    /// Returns:
    /// - `Ok(Some((key, value)))` — a complete record
    /// - `Ok(None)` — clean end-of-file at a record boundary
    /// - `Err(Malformed)` — any partial record
    pub fn next_record(&mut self) -> Result<Option<(String, Bytes)>> {
        let key_len = match read_record_len(&mut self.reader)? {
            Some(len) => len,
            None => return Ok(None),
        };

        let key = read_bytes(&mut self.reader, key_len as usize, "key")?;
        let key = into_string(key, "key")?;

        let value_len = read_len(&mut self.reader, "value length")?;
        let value = read_bytes(&mut self.reader, value_len as usize, "value")?;

        self.records_read += 1;
        Ok(Some((key, Bytes::from(value))))
    }
}

impl<R: Read> Iterator for SnapshotReader<R> {
    type Item = Result<(String, Bytes)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
