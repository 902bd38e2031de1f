//! # kvdb
//!
//! An embedded key-value store with:
//! - String keys and opaque byte values, held in memory
//! - Sharded storage with one RwLock per shard
//! - Whole-database snapshots to a single file, replaced atomically
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Database                              │
//! │           (name + insert/get/delete/keys/export)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ ShardedMap  │          │   Persist   │
//!   │ (N × Shard) │─────────▶│ (snapshot)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Shard    │          │ temp file + │
//!   │  (RwLock)   │          │   rename    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvdb::Database;
//!
//! # fn main() -> kvdb::Result<()> {
//! let db = Database::open("inventory.kvdb", true)?;
//! db.insert("apples", b"12".to_vec(), true)?;
//! db.export("inventory.kvdb")?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod map;
pub mod persist;
pub mod database;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, KvError, Result};
pub use config::Config;
pub use database::Database;

// =============================================================================
// Limits & Version Info
// =============================================================================

/// Maximum database name length in bytes (fits the 1-byte length prefix)
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Current version of kvdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
