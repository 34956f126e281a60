//! # Editor Adapter
//!
//! The editing engine is not part of this crate. The autosave pipeline only
//! needs three things from it:
//!
//! - a single "document changed" callback ([`EditorAdapter::on_change`]),
//! - a serializable snapshot of the current document ([`EditorAdapter::snapshot`]),
//! - a way to replace the document, or reset it to empty
//!   ([`EditorAdapter::set_content`]).
//!
//! [`MemoryEditor`] is a complete in-process implementation. It models a
//! document as a JSON tree and fires the callback only for transactions that
//! actually change the document, the way a real engine reports `docChanged`.

use crate::error::{NotebookError, Result};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

pub trait EditorAdapter: Send + Sync {
    /// Register the change callback. A later registration replaces the
    /// earlier one; there is one listener per live session.
    fn on_change(&self, callback: ChangeCallback);

    /// Serialize the current document.
    fn snapshot(&self) -> Result<Value>;

    /// Replace the document with `content`, or start an empty one.
    /// Does not count as a change.
    fn set_content(&self, content: Option<&Value>) -> Result<()>;
}

/// A document with a single empty paragraph.
pub fn empty_document() -> Value {
    json!({ "type": "doc", "content": [{ "type": "paragraph" }] })
}

fn check_document(content: &Value) -> Result<()> {
    match content.get("type").and_then(Value::as_str) {
        Some(_) => Ok(()),
        None => Err(NotebookError::Editor(
            "document JSON must be an object with a string `type`".to_string(),
        )),
    }
}

pub struct MemoryEditor {
    doc: Mutex<Value>,
    listener: Mutex<Option<ChangeCallback>>,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self {
            doc: Mutex::new(empty_document()),
            listener: Mutex::new(None),
        }
    }
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self) -> MutexGuard<'_, Value> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listener(&self) -> Option<ChangeCallback> {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dispatch a transaction that leaves the editor holding `doc`.
    /// Returns whether the document changed (and the listener fired).
    pub fn apply(&self, doc: Value) -> bool {
        let changed = {
            let mut current = self.doc();
            if *current == doc {
                false
            } else {
                *current = doc;
                true
            }
        };
        if changed {
            if let Some(listener) = self.listener() {
                listener();
            }
        }
        changed
    }

    /// Current document, same as `snapshot` but infallible.
    pub fn document(&self) -> Value {
        self.doc().clone()
    }
}

impl EditorAdapter for MemoryEditor {
    fn on_change(&self, callback: ChangeCallback) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    fn snapshot(&self) -> Result<Value> {
        Ok(self.document())
    }

    fn set_content(&self, content: Option<&Value>) -> Result<()> {
        let next = match content {
            Some(content) => {
                check_document(content)?;
                content.clone()
            }
            None => empty_document(),
        };
        *self.doc() = next;
        Ok(())
    }
}
