//! Two-tier key-value storage for the simulated dashboard.
//!
//! All persisted state goes through a single [`KeyValueStore`] trait with an
//! explicit durability class per call:
//!
//! - [`Tier::Session`] — ephemeral, cleared when the session ends. Holds
//!   everything privacy-sensitive: session record, operation log, wallet
//!   snapshot, transaction log.
//! - [`Tier::Local`] — longer-lived, used only for restoration convenience
//!   (last login email, lock marker, wallet backup). Never trusted for
//!   security-relevant state.
//!
//! Services do not handle storage errors individually: the JSON helpers in
//! this module absorb backend and codec failures, log them, and hand the
//! caller an absent/default value. Malformed records are purged on read.

mod error;
pub mod keys;
mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Durability class for a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Ephemeral storage, wiped when the session ends.
    Session,
    /// Longer-lived storage for restoration convenience only.
    Local,
}

/// Pluggable key-value backend with two durability tiers.
pub trait KeyValueStore: Send + Sync {
    /// Reads the record at `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails the read.
    fn get(&self, tier: Tier, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes a record, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails the write.
    fn put(&self, tier: Tier, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Deletes the record at `key`. Deleting a missing record is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails the delete.
    fn delete(&self, tier: Tier, key: &str) -> StorageResult<()>;

    /// Removes every record in a tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails the wipe.
    fn clear_tier(&self, tier: Tier) -> StorageResult<()>;
}

/// Reads and decodes a JSON record, absorbing all failure modes.
///
/// Backend errors are logged and reported as absence. A record that fails
/// to parse is purged so the next read starts clean.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    tier: Tier,
    key: &str,
) -> Option<T> {
    let bytes = match store.get(tier, key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, %err, "storage read failed; treating as absent");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, %err, "malformed record; purging");
            if let Err(err) = store.delete(tier, key) {
                tracing::warn!(key, %err, "failed to purge malformed record");
            }
            None
        }
    }
}

/// Encodes and writes a JSON record, absorbing all failure modes.
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, tier: Tier, key: &str, value: &T) {
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(key, %err, "failed to encode record; dropping write");
            return;
        }
    };
    if let Err(err) = store.put(tier, key, &bytes) {
        tracing::warn!(key, %err, "storage write failed; dropping write");
    }
}

/// Deletes a record, absorbing backend failures.
pub fn delete_entry(store: &dyn KeyValueStore, tier: Tier, key: &str) {
    if let Err(err) = store.delete(tier, key) {
        tracing::warn!(key, %err, "storage delete failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_round_trip() {
        let store = MemoryStore::new();
        write_json(&store, Tier::Session, "k", &vec![1u32, 2, 3]);
        let loaded: Option<Vec<u32>> = read_json(&store, Tier::Session, "k");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_read_json_purges_malformed_record() {
        let store = MemoryStore::new();
        store
            .put(Tier::Session, "k", b"{not json")
            .expect("put raw bytes");

        let loaded: Option<Vec<u32>> = read_json(&store, Tier::Session, "k");
        assert!(loaded.is_none());
        // The bad record must be gone after the failed read.
        assert!(store.get(Tier::Session, "k").expect("get").is_none());
    }

    #[test]
    fn test_read_json_absent_key() {
        let store = MemoryStore::new();
        let loaded: Option<String> = read_json(&store, Tier::Local, "missing");
        assert!(loaded.is_none());
    }
}
