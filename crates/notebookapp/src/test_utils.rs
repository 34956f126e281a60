use crate::clock::ManualClock;
use crate::store::{DocumentStore, FsBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: DocumentStore<FsBackend>,
    pub clock: Arc<ManualClock>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = DocumentStore::with_backend(FsBackend::new(&root)).with_clock(clock.clone());
        Self {
            _temp_dir: temp_dir,
            store,
            clock,
            root,
        }
    }

    pub fn entry_dir(&self, id: &str) -> PathBuf {
        self.store.backend().entry_path(id)
    }
}
