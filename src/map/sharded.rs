//! Sharded map
//!
//! Fixed array of shards plus the routing function from key to shard.

use std::collections::HashMap;

use bytes::Bytes;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;

use super::Shard;

/// A fixed set of shards with deterministic key routing
///
/// ## Consistency:
/// Whole-map views (`all_entries`, `keys`, `to_raw_map`) visit shards in
/// index order and hold one read lock at a time. Each shard's contribution
/// is a point-in-time snapshot; the aggregate is not. Writers racing with a
/// walk may or may not be reflected.
#[derive(Debug)]
pub struct ShardedMap {
    shards: Box<[Shard]>,
}

impl ShardedMap {
    /// Create a map with `shard_count` empty shards (at least one)
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Shard::new()).collect();
        Self { shards }
    }

    /// Index of the shard owning `key`
    ///
    /// Unseeded, so stable for the life of the process. Never persisted.
    #[inline]
    pub fn shard_for(&self, key: &str) -> usize {
        (xxh3_64(key.as_bytes()) % self.shards.len() as u64) as usize
    }

    #[inline]
    fn shard(&self, key: &str) -> &Shard {
        &self.shards[self.shard_for(key)]
    }

    pub fn insert(&self, key: String, value: Bytes, overwrite: bool) -> Result<()> {
        self.shard(&key).insert(key, value, overwrite)
    }

    pub fn replace(&self, key: String, value: Bytes) -> Option<Bytes> {
        self.shard(&key).replace(key, value)
    }

    pub fn get(&self, key: &str) -> Result<Bytes> {
        self.shard(key).get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.shard(key).contains_key(key)
    }

    pub fn delete(&self, key: &str) {
        self.shard(key).delete(key)
    }

    /// Shards in fixed routing order
    pub fn shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.iter()
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Concatenated per-shard snapshots
    pub fn all_entries(&self) -> Vec<(String, Bytes)> {
        let mut entries = Vec::new();
        for shard in self.shards() {
            entries.extend(shard.snapshot());
        }
        entries
    }

    /// Concatenated per-shard key lists
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for shard in self.shards() {
            keys.extend(shard.keys());
        }
        keys
    }

    /// Owned copy of all data
    pub fn to_raw_map(&self) -> HashMap<String, Bytes> {
        self.all_entries().into_iter().collect()
    }

    /// Total keys across shards (summed one shard at a time)
    pub fn len(&self) -> usize {
        self.shards().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards().all(Shard::is_empty)
    }
}
