//! Document identifiers.
//!
//! Ids are opaque strings. New ones are random UUID v4 values rendered as
//! hyphenated lowercase text; no collision check is made against stored ids.
//!
//! Because an id names a directory under the storage root, anything that
//! reaches the filesystem must pass [`validate_id`] first.

use crate::error::{NotebookError, Result};
use uuid::Uuid;

const MAX_ID_LEN: usize = 128;

/// Returns a fresh, globally unique document id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Checks that `id` is safe to use as a single path component.
pub fn validate_id(id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(NotebookError::InvalidId(id.to_string()))
    }
}

pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id != "."
        && id != ".."
        && !id
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}
