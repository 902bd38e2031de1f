//! Persistence Module
//!
//! Whole-database snapshots in a single file.
//!
//! ## Responsibilities
//! - Write the full contents of a database to a temporary file and rename it
//!   over the target, so readers never observe a half-written file
//! - Read a snapshot back sequentially, record by record
//!
//! ## File Format
//! All integers are little-endian and unsigned.
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header                                  │
//! │ ┌──────────────┬──────────────────────┐ │
//! │ │ NameLen (1)  │ Name (NameLen bytes) │ │
//! │ └──────────────┴──────────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Record (repeated until end-of-file)     │
//! │ ┌─────────┬─────┬─────────┬─────────┐   │
//! │ │KeyLen(4)│ Key │ValLen(4)│  Value  │   │
//! │ └─────────┴─────┴─────────┴─────────┘   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! There is no checksum, record count or version tag. End-of-file at a
//! record boundary is the only terminator, so a file truncated exactly
//! between records is indistinguishable from a shorter valid file.

mod format;
mod reader;
mod writer;

pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;

/// Advisory file extension for database files (`<name>.kvdb`)
pub const FILE_EXTENSION: &str = "kvdb";

/// Size of the name length prefix
pub(crate) const NAME_LEN_SIZE: usize = 1;

/// Size of each key/value length prefix
pub(crate) const CHUNK_LEN_SIZE: usize = 4;
