//! In-process advisory locks keyed by correction id.
//!
//! Two resolutions of the same id in one process run one after the other;
//! resolutions of different ids do not contend. Nothing here coordinates
//! across processes.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError, Weak},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held for the duration of one resolution; releases the id on drop.
pub type IdGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct IdLocks {
  slots: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl IdLocks {
  pub fn new() -> Self { Self::default() }

  /// Wait until no other holder has `id`, then take it.
  pub async fn acquire(&self, id: &str) -> IdGuard {
    let slot = {
      let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
      slots.retain(|_, weak| weak.strong_count() > 0);

      match slots.get(id).and_then(Weak::upgrade) {
        Some(slot) => slot,
        None => {
          let slot = Arc::new(AsyncMutex::new(()));
          slots.insert(id.to_owned(), Arc::downgrade(&slot));
          slot
        }
      }
    };
    slot.lock_owned().await
  }

  /// Number of ids currently held or awaited.
  pub fn active(&self) -> usize {
    let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
    slots.values().filter(|weak| weak.strong_count() > 0).count()
  }
}
