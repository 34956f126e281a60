//! # Autosave
//!
//! Turns a live editing session into durable saves without writing on every
//! keystroke.
//!
//! ## Session
//!
//! A coordinator is either **bound** to a stored document id or **unbound**
//! (a new, untitled document). Only bound documents are autosaved; the user
//! opts in by saving once with a name.
//!
//! | Operation        | Effect on binding             |
//! |------------------|-------------------------------|
//! | `save_as(name)`  | bind (new id if unbound), rename |
//! | `open(id)`       | bind to `id`                  |
//! | `new_document()` | unbind                        |
//!
//! ## Debounce
//!
//! Every change notification re-arms a single [`timer::DebounceTimer`]. When
//! the editor has been quiet for the configured delay the timer fires, the
//! coordinator reads the binding *at that moment*, snapshots the editor, and
//! saves. A burst of edits becomes one save carrying the latest content.
//!
//! Switching documents retires the pending save of the previous context:
//! `open` flushes it to the old id first, `new_document` drops it.
//!
//! The editor's `snapshot` and `set_content` are called with the session
//! locked; they must not call back into the coordinator.
//!
//! ## Failures
//!
//! Explicit operations return their errors. A failed background save is
//! logged at error level and kept as [`AutosaveCoordinator::last_error`];
//! there is no retry, the next edit simply schedules another attempt.

pub mod timer;

use crate::editor::EditorAdapter;
use crate::error::Result;
use crate::model::{DocumentMeta, DEFAULT_DOCUMENT_NAME};
use crate::store::{DocumentStore, StorageBackend};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use timer::DebounceTimer;
use tracing::{debug, error, info};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
struct Session {
    current_id: Option<String>,
    current_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current_id: None,
            current_name: DEFAULT_DOCUMENT_NAME.to_string(),
        }
    }
}

struct Inner<B: StorageBackend, E: EditorAdapter> {
    store: Arc<DocumentStore<B>>,
    editor: Arc<E>,
    session: Mutex<Session>,
    timer: DebounceTimer,
    delay: Duration,
    // Background saves run one at a time.
    save_gate: tokio::sync::Mutex<()>,
    last_error: Mutex<Option<String>>,
}

impl<B: StorageBackend, E: EditorAdapter> Inner<B, E> {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn binding(&self) -> Option<(String, String)> {
        let session = self.session();
        session
            .current_id
            .clone()
            .map(|id| (id, session.current_name.clone()))
    }

    fn bind(&self, meta: &DocumentMeta) {
        let mut session = self.session();
        session.current_id = Some(meta.id.clone());
        session.current_name = meta.name.clone();
    }

    fn record_error(&self, message: Option<String>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// The binding together with the editor content it owns.
    ///
    /// Both are read under the session lock, and `open`/`new_document`
    /// replace content and binding under the same lock, so content is never
    /// paired with another document's id.
    fn capture(&self) -> Option<(String, String, Result<Value>)> {
        let session = self.session();
        let id = session.current_id.clone()?;
        Some((id, session.current_name.clone(), self.editor.snapshot()))
    }

    /// Save whatever the session is bound to right now.
    /// `None` when unbound.
    async fn save_current(&self) -> Option<Result<DocumentMeta>> {
        let _gate = self.save_gate.lock().await;
        let (id, name, snapshot) = self.capture()?;

        let result = match snapshot {
            Ok(content) => self.store.save(&id, &name, &content).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(meta) => {
                debug!(id = %meta.id, modified = meta.modified, "autosaved");
                self.record_error(None);
            }
            Err(err) => {
                error!(id = %id, error = %err, "autosave failed");
                self.record_error(Some(err.to_string()));
            }
        }
        Some(result)
    }

    async fn fire(&self) {
        if self.save_current().await.is_none() {
            debug!("autosave skipped: document was unbound before the timer fired");
        }
    }
}

/// Debounced autosave for one editing session.
///
/// Cheap to clone; clones share the session.
pub struct AutosaveCoordinator<B: StorageBackend, E: EditorAdapter> {
    inner: Arc<Inner<B, E>>,
}

impl<B: StorageBackend, E: EditorAdapter> Clone for AutosaveCoordinator<B, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B, E> AutosaveCoordinator<B, E>
where
    B: StorageBackend + 'static,
    E: EditorAdapter + 'static,
{
    pub fn new(store: Arc<DocumentStore<B>>, editor: Arc<E>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                editor,
                session: Mutex::new(Session::default()),
                timer: DebounceTimer::new(),
                delay,
                save_gate: tokio::sync::Mutex::new(()),
                last_error: Mutex::new(None),
            }),
        }
    }

    /// Register as the editor's change listener.
    ///
    /// The editor only holds a weak reference, so dropping every coordinator
    /// clone turns the callback into a no-op.
    pub fn attach(&self) {
        let weak = Arc::downgrade(&self.inner);
        self.inner.editor.on_change(Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                AutosaveCoordinator { inner }.notify_change();
            }
        }));
    }

    /// Handle a "document changed" signal. Must run inside a tokio runtime.
    pub fn notify_change(&self) {
        if self.inner.session().current_id.is_none() {
            return;
        }
        let inner = self.inner.clone();
        self.inner
            .timer
            .arm(self.inner.delay, move || async move { inner.fire().await });
    }

    /// Save now under `name`, binding the session to the result.
    ///
    /// Uses the bound id, or a fresh one for an untitled document. A pending
    /// autosave is left alone.
    pub async fn save_as(&self, name: &str) -> Result<DocumentMeta> {
        let (id, content) = match self.inner.capture() {
            Some((id, _, content)) => (id, content?),
            None => (self.inner.store.generate_id(), self.inner.editor.snapshot()?),
        };
        let meta = self.inner.store.save(&id, name, &content).await?;
        self.inner.bind(&meta);
        info!(id = %meta.id, name = %meta.name, "document saved");
        Ok(meta)
    }

    /// Load `id` into the editor and bind to it.
    ///
    /// Returns `Ok(None)` and changes nothing if the document is not
    /// available. Before switching, a pending autosave of the current
    /// document is written to its own id.
    pub async fn open(&self, id: &str) -> Result<Option<DocumentMeta>> {
        let Some(record) = self.inner.store.load(id).await else {
            return Ok(None);
        };

        if let Err(err) = self.flush().await {
            error!(error = %err, "could not save previous document before opening another");
        }

        {
            let mut session = self.inner.session();
            self.inner.editor.set_content(Some(&record.content))?;
            session.current_id = Some(record.meta.id.clone());
            session.current_name = record.meta.name.clone();
        }
        info!(id = %record.meta.id, name = %record.meta.name, "document opened");
        Ok(Some(record.meta))
    }

    /// Start an untitled document. A pending autosave is dropped.
    pub fn new_document(&self) -> Result<()> {
        {
            let mut session = self.inner.session();
            self.inner.editor.set_content(None)?;
            self.inner.timer.cancel();
            *session = Session::default();
        }
        info!("new untitled document");
        Ok(())
    }

    /// Run a pending autosave immediately.
    ///
    /// Returns the saved metadata, or `None` if nothing was pending.
    pub async fn flush(&self) -> Result<Option<DocumentMeta>> {
        if !self.inner.timer.cancel() {
            return Ok(None);
        }
        self.inner.save_current().await.transpose()
    }

    /// The bound id and name, if any.
    pub fn current(&self) -> Option<(String, String)> {
        self.inner.binding()
    }

    pub fn current_name(&self) -> String {
        self.inner.session().current_name.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.timer.is_pending()
    }

    /// Message of the most recent failed background save, cleared by the
    /// next successful one.
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}
