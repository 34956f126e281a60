use super::backend::{Artifact, StorageBackend};
use crate::error::{NotebookError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Directory that holds one sub-directory per document.
pub const DOCUMENTS_DIR: &str = "documents";

const TMP_SUFFIX: &str = ".tmp";

/// Filesystem backend rooted at `<data_dir>/documents`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join(DOCUMENTS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    fn artifact_path(&self, id: &str, artifact: Artifact) -> PathBuf {
        self.entry_path(id).join(artifact.file_name())
    }

    /// Every name in the root, whatever its kind. A missing root is empty.
    async fn scan_root(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(NotebookError::Io(err)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(NotebookError::Io)? {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn is_entry_dir(&self, name: &str) -> Result<bool> {
        match fs::symlink_metadata(self.entry_path(name)).await {
            Ok(meta) => Ok(meta.is_dir()),
            // Entry vanished between scan and stat: a concurrent delete.
            Err(err) if is_missing(&err) => Ok(false),
            Err(err) => Err(NotebookError::Io(err)),
        }
    }
}

fn is_missing(err: &std::io::Error) -> bool {
    // A file where the entry directory should be reads as "not there" too.
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn list_entries(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for name in self.scan_root().await? {
            if self.is_entry_dir(&name).await? {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn read_artifact(&self, id: &str, artifact: Artifact) -> Result<Option<String>> {
        match fs::read_to_string(self.artifact_path(id, artifact)).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if is_missing(&err) => Ok(None),
            Err(err) => Err(NotebookError::Io(err)),
        }
    }

    async fn write_artifact(&self, id: &str, artifact: Artifact, data: &str) -> Result<()> {
        let entry = self.entry_path(id);
        fs::create_dir_all(&entry).await.map_err(NotebookError::Io)?;

        let target = entry.join(artifact.file_name());

        // Atomic Write
        let tmp = entry.join(format!(".{}-{}{}", artifact.file_name(), Uuid::new_v4(), TMP_SUFFIX));
        if let Err(err) = fs::write(&tmp, data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(NotebookError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(NotebookError::Io(err));
        }
        Ok(())
    }

    async fn remove_entry(&self, id: &str) -> Result<bool> {
        match fs::remove_dir_all(self.entry_path(id)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(NotebookError::Io(err)),
        }
    }

    async fn sweep_entry(&self, id: &str) -> Result<usize> {
        let mut entries = match fs::read_dir(self.entry_path(id)).await {
            Ok(entries) => entries,
            Err(err) if is_missing(&err) => return Ok(0),
            Err(err) => return Err(NotebookError::Io(err)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(NotebookError::Io)? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') && name.ends_with(TMP_SUFFIX) {
                match fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => return Err(NotebookError::Io(err)),
                }
            }
        }
        Ok(removed)
    }
}
