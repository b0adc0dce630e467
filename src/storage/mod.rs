//! Persistence layer.
//!
//! The ledger never touches the filesystem directly; it reads and writes
//! serialized values under two logical keys through a `KeyValueStore`.
//! `MemoryStore` backs tests and throwaway sessions, `JsonFileStore` backs
//! the binary.

pub mod file;

use std::collections::HashMap;

use crate::types::StorageError;

pub use file::JsonFileStore;

/// Key holding the serialized bet list.
pub const BETS_KEY: &str = "bet-tracker-bets";

/// Key holding the next-id counter.
pub const NEXT_ID_KEY: &str = "bet-tracker-next-id";

/// Durable key-value storage used by the ledger.
///
/// A read that follows a successful write must observe that write.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store. Contents live as long as the value does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with raw values, e.g. a snapshot written by an older build.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
