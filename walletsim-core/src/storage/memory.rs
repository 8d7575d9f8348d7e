//! In-memory storage backend.
//!
//! The default backend for the simulated dashboard. Both tiers live in the
//! same process; the distinction only matters to callers choosing a
//! durability class per record.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{KeyValueStore, StorageResult, Tier};

/// Thread-safe in-memory implementation of [`KeyValueStore`].
///
/// Backs both tiers with `RwLock`'d maps. Clearing the session tier models
/// the browser tab closing; the local tier survives until explicitly
/// cleared.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: RwLock<HashMap<String, Vec<u8>>>,
    local: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records in a tier.
    #[must_use]
    pub fn len(&self, tier: Tier) -> usize {
        self.map(tier)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if a tier holds no records.
    #[must_use]
    pub fn is_empty(&self, tier: Tier) -> bool {
        self.len(tier) == 0
    }

    const fn map(&self, tier: Tier) -> &RwLock<HashMap<String, Vec<u8>>> {
        match tier {
            Tier::Session => &self.session,
            Tier::Local => &self.local,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, tier: Tier, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self
            .map(tier)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn put(&self, tier: Tier, key: &str, value: &[u8]) -> StorageResult<()> {
        self.map(tier)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, tier: Tier, key: &str) -> StorageResult<()> {
        self.map(tier)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn clear_tier(&self, tier: Tier) -> StorageResult<()> {
        self.map(tier)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_independent() {
        let store = MemoryStore::new();
        store.put(Tier::Session, "k", b"session").expect("put");
        store.put(Tier::Local, "k", b"local").expect("put");

        assert_eq!(
            store.get(Tier::Session, "k").expect("get"),
            Some(b"session".to_vec())
        );
        assert_eq!(
            store.get(Tier::Local, "k").expect("get"),
            Some(b"local".to_vec())
        );

        store.clear_tier(Tier::Session).expect("clear");
        assert!(store.get(Tier::Session, "k").expect("get").is_none());
        assert_eq!(
            store.get(Tier::Local, "k").expect("get"),
            Some(b"local".to_vec())
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put(Tier::Local, "k", b"v").expect("put");
        store.delete(Tier::Local, "k").expect("delete");
        store.delete(Tier::Local, "k").expect("delete again");
        assert!(store.is_empty(Tier::Local));
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.put(Tier::Session, "k", b"first").expect("put");
        store.put(Tier::Session, "k", b"second").expect("put");
        assert_eq!(
            store.get(Tier::Session, "k").expect("get"),
            Some(b"second".to_vec())
        );
        assert_eq!(store.len(Tier::Session), 1);
    }
}
