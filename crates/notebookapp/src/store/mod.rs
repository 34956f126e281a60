//! # Storage Layer
//!
//! Documents live in a directory tree that the application owns outright:
//!
//! ```text
//! <data_dir>/
//! └── documents/
//!     └── {id}/
//!         ├── meta.json       # DocumentMeta: id, name, created, modified
//!         └── document.json   # editor content, opaque JSON
//! ```
//!
//! Metadata and content are separate files so that listing only ever reads
//! the small `meta.json` of each entry, never the content payload.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw artifact I/O ("how").
//!   [`fs_backend::FsBackend`] for disk, [`mem_backend::MemBackend`] for tests.
//! - [`document_store::DocumentStore`]: upsert rules, listing order,
//!   corruption tolerance, repair ("what").
//!
//! There is no cache. Every call reflects what is on disk at that moment.
//!
//! ## Failure Policy
//!
//! - **Reads** (`list`, `load`): a missing or unparsable artifact means the
//!   document is not available. The entry is skipped, never raised.
//! - **Writes** (`save`, `delete`): errors propagate. No retries.
//!
//! ## Write Order
//!
//! `save` writes `meta.json` first, then `document.json`, each via temp file
//! and rename. A crash between the two leaves either an entry with metadata
//! and no content (first save) or new metadata over old content (update).
//! The first kind is removed by `doctor`; the second is a valid document.
//!
//! ## Concurrency
//!
//! Two writers on the same id race; whichever rename lands last wins.

pub mod backend;
pub mod document_store;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::{Artifact, StorageBackend};
pub use document_store::DocumentStore;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// Content without usable metadata that got fresh metadata.
    pub recovered_documents: usize,
    /// Entries with metadata but no content, removed.
    pub removed_incomplete: usize,
    /// Entries with neither artifact, removed.
    pub removed_empty: usize,
    /// Leftover temp files from interrupted writes.
    pub removed_temp_files: usize,
    /// Entries whose content is not JSON; left in place.
    pub unreadable: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}
