//! Controllable storage and sink doubles shared by the integration tests.
//!
//! Both hand out cloneable handles so a test can keep inspecting (or
//! breaking) the backing state after the ledger has taken ownership.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bet_tracker::cues::OutcomeSink;
use bet_tracker::storage::KeyValueStore;
use bet_tracker::types::{OutcomeEvent, StorageError};

/// In-memory key/value store whose writes can be switched off.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// If set, every save fails with this message.
    force_error: Arc<Mutex<Option<String>>>,
    saves: Arc<Mutex<usize>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, reason: &str) {
        *self.force_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn heal(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(reason) = self.force_error.lock().unwrap().clone() {
            return Err(StorageError::Unavailable(reason));
        }
        *self.saves.lock().unwrap() += 1;
        self.put_raw(key, value);
        Ok(())
    }
}

/// Sink that records every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<OutcomeEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OutcomeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl OutcomeSink for RecordingSink {
    fn emit(&self, event: OutcomeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
