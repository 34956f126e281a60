use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// A single-slot, re-armable delay.
///
/// At most one fire is pending. Arming again replaces it. Once the delay has
/// elapsed the fire leaves the slot, so re-arming or cancelling never
/// interrupts work that has already started.
///
/// Must be armed from within a tokio runtime.
#[derive(Clone, Default)]
pub struct DebounceTimer {
    slot: Arc<Mutex<Slot>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `fire` after `delay`, unless armed again or cancelled first.
    pub fn arm<F, Fut>(&self, delay: Duration, fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.slot();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(previous) = slot.pending.take() {
            previous.abort();
        }

        let generation = slot.generation;
        let shared = self.slot.clone();
        slot.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.generation != generation {
                    return;
                }
                slot.pending = None;
            }
            fire().await;
        }));
    }

    /// Drop the pending fire, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = self.slot();
        slot.generation = slot.generation.wrapping_add(1);
        match slot.pending.take() {
            Some(pending) => {
                pending.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot().pending.is_some()
    }
}
