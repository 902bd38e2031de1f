//! Sharded Map Module
//!
//! In-memory key → value storage split into independently locked shards.
//!
//! ## Responsibilities
//! - Route every key to exactly one shard
//! - Keep lock contention local to a key's shard
//! - Aggregate whole-map views (entries, keys) one shard at a time
//!
//! ## Locking
//! ```text
//! ┌───────────┐ ┌───────────┐       ┌───────────┐
//! │  Shard 0  │ │  Shard 1  │  ...  │ Shard N-1 │
//! │ (RwLock)  │ │ (RwLock)  │       │ (RwLock)  │
//! └───────────┘ └───────────┘       └───────────┘
//!       ▲
//!       └── xxh3(key) % N
//! ```
//!
//! No operation holds more than one shard lock at a time, so there is no
//! lock ordering between shards and no cross-shard deadlock.

mod shard;
mod sharded;

pub use shard::Shard;
pub use sharded::ShardedMap;
