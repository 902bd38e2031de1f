//! Error types for kvdb
//!
//! Two classes of failure share one enum:
//! - the closed taxonomy of expected outcomes (`NameTooLong`, `KeyExists`,
//!   `KeyNotPresent`), see [`ErrorKind`]
//! - unstructured failures from I/O or a malformed file

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvdb operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Expected Outcomes
    // -------------------------------------------------------------------------
    #[error("Database name too long: {len} bytes (max {max})", max = crate::MAX_NAME_LEN)]
    NameTooLong { len: usize },

    #[error("Key exists and overwrite is disabled")]
    KeyExists,

    #[error("Key not present in database")]
    KeyNotPresent,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Malformed database file: {0}")]
    Malformed(String),

    #[error("Chunk too large for a 4-byte length prefix: {len} bytes")]
    ChunkTooLarge { len: usize },
}

/// The closed set of recoverable outcomes.
///
/// Codes are stable and start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    NameTooLong = 1,
    KeyExists = 2,
    KeyNotPresent = 3,
}

impl ErrorKind {
    /// Numeric code for this kind
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl KvError {
    /// Classify this error.
    ///
    /// Returns `None` for I/O and format failures, which are outside the
    /// closed taxonomy.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            KvError::NameTooLong { .. } => Some(ErrorKind::NameTooLong),
            KvError::KeyExists => Some(ErrorKind::KeyExists),
            KvError::KeyNotPresent => Some(ErrorKind::KeyNotPresent),
            KvError::Io(_) | KvError::Malformed(_) | KvError::ChunkTooLarge { .. } => None,
        }
    }
}
