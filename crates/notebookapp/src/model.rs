//! # Domain Model
//!
//! A stored document is two things: a small [`DocumentMeta`] record and an
//! opaque content tree. The content is whatever the editor serializes (a JSON
//! value); this crate never looks inside it.
//!
//! ## Timestamps
//!
//! `created` and `modified` are milliseconds since the Unix epoch, serialized
//! as plain integers so the on-disk `meta.json` stays readable by any tool:
//!
//! ```json
//! {
//!   "id": "5f1c…",
//!   "name": "Groceries",
//!   "created": 1718000000000,
//!   "modified": 1718000004200
//! }
//! ```
//!
//! ## Invariants
//!
//! - `id` never changes after the first save.
//! - `modified >= created`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    pub created: i64,
    pub modified: i64,
}

impl DocumentMeta {
    /// Metadata for a document saved for the first time at `now`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Records a later save. `created` is untouched and `modified` never
    /// drops below it, even if the clock stepped backwards.
    pub fn touch(&mut self, name: impl Into<String>, now: i64) {
        self.name = name.into();
        self.modified = now.max(self.created);
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.modified).single()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created).single()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub meta: DocumentMeta,
    pub content: Value,
}
