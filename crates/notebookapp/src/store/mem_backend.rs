use super::backend::{Artifact, StorageBackend};
use crate::error::{NotebookError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Entries = BTreeMap<String, HashMap<Artifact, String>>;

/// In-memory storage backend for testing.
///
/// Uses a `Mutex` rather than `RefCell` because autosave fires on a spawned
/// tokio task, so the backend has to be `Send + Sync`.
#[derive(Default)]
pub struct MemBackend {
    entries: Mutex<Entries>,
    simulate_write_error: AtomicBool,
    simulate_read_error: AtomicBool,
    content_writes: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// --- Test Controls ---

#[cfg(any(test, feature = "test_utils"))]
impl MemBackend {
    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Make artifact reads fail, as an unreadable file would.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of successful content writes so far. Every store save performs
    /// exactly one, so this counts saves.
    pub fn content_writes(&self) -> usize {
        self.content_writes.load(Ordering::SeqCst)
    }

    /// Test helper to drop a single artifact, leaving the entry behind.
    pub fn remove_artifact(&self, id: &str, artifact: Artifact) -> bool {
        self.entries()
            .get_mut(id)
            .map(|files| files.remove(&artifact).is_some())
            .unwrap_or(false)
    }

    /// Test helper to place raw text into an artifact, bypassing the store.
    pub fn put_raw(&self, id: &str, artifact: Artifact, data: &str) {
        self.entries()
            .entry(id.to_string())
            .or_default()
            .insert(artifact, data.to_string());
    }

    /// Test helper to create an entry with no artifacts in it.
    pub fn put_empty_entry(&self, id: &str) {
        self.entries().entry(id.to_string()).or_default();
    }
}

#[async_trait]
impl StorageBackend for MemBackend {
    async fn list_entries(&self) -> Result<Vec<String>> {
        Ok(self.entries().keys().cloned().collect())
    }

    async fn read_artifact(&self, id: &str, artifact: Artifact) -> Result<Option<String>> {
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(NotebookError::Store("Simulated read error".to_string()));
        }
        Ok(self
            .entries()
            .get(id)
            .and_then(|files| files.get(&artifact))
            .cloned())
    }

    async fn write_artifact(&self, id: &str, artifact: Artifact, data: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(NotebookError::Store("Simulated write error".to_string()));
        }
        self.entries()
            .entry(id.to_string())
            .or_default()
            .insert(artifact, data.to_string());
        if artifact == Artifact::Content {
            self.content_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn remove_entry(&self, id: &str) -> Result<bool> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(NotebookError::Store("Simulated write error".to_string()));
        }
        Ok(self.entries().remove(id).is_some())
    }
}
