//! Shard implementation
//!
//! HashMap-based partition with its own RwLock.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{KvError, Result};

/// One lock-guarded partition of the key space
#[derive(Debug, Default)]
pub struct Shard {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value (write lock)
    ///
    /// The existence check and the write happen under the same exclusive
    /// acquisition, so two racing non-overwriting inserts of one key cannot
    /// both succeed.
    pub fn insert(&self, key: String, value: Bytes, overwrite: bool) -> Result<()> {
        let mut entries = self.entries.write();

        match entries.entry(key) {
            Entry::Occupied(_) if !overwrite => Err(KvError::KeyExists),
            Entry::Occupied(mut slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Store a value unconditionally (write lock), returning the one it replaced
    pub fn replace(&self, key: String, value: Bytes) -> Option<Bytes> {
        self.entries.write().insert(key, value)
    }

    /// Get a value by key (read lock)
    pub fn get(&self, key: &str) -> Result<Bytes> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or(KvError::KeyNotPresent)
    }

    /// Check for a key without cloning its value (read lock)
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Remove a key if present (write lock). Silent when absent.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// All pairs currently held, taken under one read acquisition
    pub fn snapshot(&self) -> Vec<(String, Bytes)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// All keys currently held, taken under one read acquisition
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the shard holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
