//! # API Facade
//!
//! The operations a UI shell needs, and nothing else:
//! `list_documents`, `load_document`, `save_document`, `delete_document`,
//! `generate_id`, plus `doctor` and a factory for an attached
//! [`AutosaveCoordinator`].
//!
//! The facade holds no state of its own beyond the store handle and the
//! autosave delay. It is generic over [`StorageBackend`] so shells can be
//! tested against [`crate::store::MemBackend`].

use crate::autosave::{AutosaveCoordinator, DEFAULT_AUTOSAVE_DELAY};
use crate::config::NotebookConfig;
use crate::editor::EditorAdapter;
use crate::error::Result;
use crate::model::{DocumentMeta, DocumentRecord};
use crate::store::{DoctorReport, DocumentStore, FsBackend, StorageBackend};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct NotebookApi<B: StorageBackend> {
    store: Arc<DocumentStore<B>>,
    autosave_delay: Duration,
}

impl NotebookApi<FsBackend> {
    /// Filesystem-backed API rooted at the configured data directory.
    pub fn from_config(config: &NotebookConfig) -> Self {
        let backend = FsBackend::new(config.resolved_data_dir());
        Self::new(DocumentStore::with_backend(backend)).with_autosave_delay(config.autosave_delay())
    }
}

impl<B: StorageBackend + 'static> NotebookApi<B> {
    pub fn new(store: DocumentStore<B>) -> Self {
        Self {
            store: Arc::new(store),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    pub fn store(&self) -> &Arc<DocumentStore<B>> {
        &self.store
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentMeta>> {
        self.store.list().await
    }

    pub async fn load_document(&self, id: &str) -> Option<DocumentRecord> {
        self.store.load(id).await
    }

    pub async fn save_document(&self, id: &str, name: &str, content: &Value) -> Result<DocumentMeta> {
        self.store.save(id, name, content).await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }

    pub fn generate_id(&self) -> String {
        self.store.generate_id()
    }

    pub async fn doctor(&self) -> Result<DoctorReport> {
        self.store.doctor().await
    }

    /// A coordinator for a new editing session, already listening to `editor`.
    pub fn autosave<E: EditorAdapter + 'static>(&self, editor: Arc<E>) -> AutosaveCoordinator<B, E> {
        let coordinator = AutosaveCoordinator::new(self.store.clone(), editor, self.autosave_delay);
        coordinator.attach();
        coordinator
    }
}
