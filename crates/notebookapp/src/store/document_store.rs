use super::backend::{Artifact, StorageBackend};
use super::DoctorReport;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::id::{self, is_valid_id, validate_id};
use crate::model::{DocumentMeta, DocumentRecord};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name given to documents whose metadata had to be rebuilt by `doctor`.
pub const RECOVERED_DOCUMENT_NAME: &str = "Recovered document";

pub struct DocumentStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    clock: Arc<dyn Clock>,
}

impl<B: StorageBackend> DocumentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A fresh id for a document that has never been saved.
    pub fn generate_id(&self) -> String {
        id::generate_id()
    }

    /// Metadata of every readable document, most recently modified first.
    ///
    /// Entries with missing, unparsable or mismatched metadata are skipped.
    /// Only failing to enumerate the root is an error.
    pub async fn list(&self) -> Result<Vec<DocumentMeta>> {
        let ids = self.backend.list_entries().await?;

        let mut metas = Vec::with_capacity(ids.len());
        for id in ids {
            if !is_valid_id(&id) {
                debug!(entry = %id, "ignoring entry with unusable name");
                continue;
            }
            if let Some(meta) = self.load_meta(&id).await {
                metas.push(meta);
            }
        }

        metas.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.id.cmp(&b.id)));
        Ok(metas)
    }

    /// Metadata and content for `id`, or `None` if either is unavailable.
    pub async fn load(&self, id: &str) -> Option<DocumentRecord> {
        if !is_valid_id(id) {
            return None;
        }
        let meta = self.load_meta(id).await?;
        let content = self.load_content(id).await?;
        Some(DocumentRecord { meta, content })
    }

    /// Create or update a document.
    ///
    /// Existing metadata keeps its `created` stamp; the name and `modified`
    /// are replaced. Content is always rewritten. Failing to read existing
    /// metadata is an error; corrupt metadata is replaced.
    pub async fn save(&self, id: &str, name: &str, content: &Value) -> Result<DocumentMeta> {
        validate_id(id)?;
        let now = self.clock.now_ms();

        let meta = match self.existing_meta(id).await? {
            Some(mut meta) => {
                meta.touch(name, now);
                meta
            }
            None => DocumentMeta::new(id, name, now),
        };

        let meta_json = serde_json::to_string_pretty(&meta)?;
        let content_json = serde_json::to_string_pretty(content)?;

        self.backend
            .write_artifact(id, Artifact::Meta, &meta_json)
            .await?;
        self.backend
            .write_artifact(id, Artifact::Content, &content_json)
            .await?;

        debug!(id = %id, modified = meta.modified, "document saved");
        Ok(meta)
    }

    /// Remove the document's entry, metadata and content together.
    /// Deleting something that is not there is fine.
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        if !self.backend.remove_entry(id).await? {
            debug!(id = %id, "delete of absent document");
        }
        Ok(())
    }

    /// Repair what interrupted writes leave behind.
    pub async fn doctor(&self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();

        for id in self.backend.list_entries().await? {
            if !is_valid_id(&id) {
                continue;
            }
            report.removed_temp_files += self.backend.sweep_entry(&id).await?;

            let has_meta = self.load_meta(&id).await.is_some();
            let raw_content = self.backend.read_artifact(&id, Artifact::Content).await?;

            match (has_meta, raw_content) {
                (true, Some(_)) => {}
                (true, None) => {
                    self.backend.remove_entry(&id).await?;
                    report.removed_incomplete += 1;
                }
                (false, None) => {
                    // Unreadable metadata with no content has nothing worth keeping.
                    let had_meta = self.backend.read_artifact(&id, Artifact::Meta).await?.is_some();
                    self.backend.remove_entry(&id).await?;
                    if had_meta {
                        report.removed_incomplete += 1;
                    } else {
                        report.removed_empty += 1;
                    }
                }
                (false, Some(raw)) => {
                    if serde_json::from_str::<Value>(&raw).is_err() {
                        warn!(id = %id, "content is not valid JSON; leaving entry untouched");
                        report.unreadable += 1;
                        continue;
                    }
                    let meta = DocumentMeta::new(id.as_str(), RECOVERED_DOCUMENT_NAME, self.clock.now_ms());
                    let meta_json = serde_json::to_string_pretty(&meta)?;
                    self.backend
                        .write_artifact(&id, Artifact::Meta, &meta_json)
                        .await?;
                    report.recovered_documents += 1;
                }
            }
        }

        Ok(report)
    }

    /// Metadata to update on save. Unlike the read paths, an I/O error is
    /// raised: treating unreadable metadata as absent would reset `created`.
    async fn existing_meta(&self, id: &str) -> Result<Option<DocumentMeta>> {
        let Some(raw) = self.backend.read_artifact(id, Artifact::Meta).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<DocumentMeta>(&raw) {
            Ok(meta) if meta.id == id => Ok(Some(meta)),
            _ => {
                warn!(id = %id, "replacing unusable document metadata");
                Ok(None)
            }
        }
    }

    async fn load_meta(&self, id: &str) -> Option<DocumentMeta> {
        let raw = match self.backend.read_artifact(id, Artifact::Meta).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(id = %id, "entry has no metadata");
                return None;
            }
            Err(err) => {
                warn!(id = %id, error = %err, "failed reading document metadata");
                return None;
            }
        };

        match serde_json::from_str::<DocumentMeta>(&raw) {
            Ok(meta) if meta.id == id => Some(meta),
            Ok(meta) => {
                warn!(id = %id, meta_id = %meta.id, "metadata id does not match its entry");
                None
            }
            Err(err) => {
                warn!(id = %id, error = %err, "skipping malformed document metadata");
                None
            }
        }
    }

    async fn load_content(&self, id: &str) -> Option<Value> {
        let raw = match self.backend.read_artifact(id, Artifact::Content).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(id = %id, error = %err, "failed reading document content");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(content) => Some(content),
            Err(err) => {
                warn!(id = %id, error = %err, "skipping malformed document content");
                None
            }
        }
    }
}
