use crate::error::Result;
use async_trait::async_trait;

/// The two files that make up a document entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {
    Meta,
    Content,
}

impl Artifact {
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Meta => "meta.json",
            Artifact::Content => "document.json",
        }
    }
}

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while DocumentStore handles the "what" (upsert rules, listing, doctor).
///
/// Ids passed in have already been validated by the store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Names of all document entries under the root.
    /// A root that does not exist yet is an empty listing, not an error.
    async fn list_entries(&self) -> Result<Vec<String>>;

    /// Read one artifact.
    /// Returns Ok(None) if the entry or the artifact does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    async fn read_artifact(&self, id: &str, artifact: Artifact) -> Result<Option<String>>;

    /// Write one artifact, creating the entry if needed.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    async fn write_artifact(&self, id: &str, artifact: Artifact, data: &str) -> Result<()>;

    /// Remove the entry with everything in it.
    /// Returns whether anything was there.
    async fn remove_entry(&self, id: &str) -> Result<bool>;

    /// Clean up leftovers of interrupted writes inside an entry.
    /// Returns how many were removed.
    async fn sweep_entry(&self, _id: &str) -> Result<usize> {
        Ok(0)
    }
}
