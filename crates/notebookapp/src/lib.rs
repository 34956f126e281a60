//! # notebookapp
//!
//! Local persistence for a rich-text note editor: a directory-per-document
//! store and the debounced autosave pipeline that feeds it from live edits.
//!
//! ## Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  UI shell (CLI in crates/notebook, or a GUI) │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  api.rs      NotebookApi facade              │
//! │  autosave/   session binding + debounce      │◄── editor.rs (EditorAdapter)
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  store/      DocumentStore over a backend    │
//! │              FsBackend | MemBackend          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Everything here is UI agnostic: no stdout, no prompts. Errors are
//! returned, diagnostics go through `tracing`.

pub mod api;
pub mod autosave;
pub mod clock;
pub mod config;
pub mod editor;
pub mod error;
pub mod id;
pub mod logging;
pub mod model;
pub mod store;

#[cfg(test)]
pub mod test_utils;
