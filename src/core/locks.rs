//! Per-definition write locks.
//!
//! Two edits of the same definition must not interleave their retire and insert steps.
//! Each definition id maps to its own async mutex; edits of different definitions never
//! wait on each other.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes keyed by recurring definition id.
#[derive(Debug, Default, Clone)]
pub struct DefinitionLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl DefinitionLocks {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, definition_id: i64) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop entries nobody is holding or waiting on
        map.retain(|id, lock| *id == definition_id || Arc::strong_count(lock) > 1);
        Arc::clone(map.entry(definition_id).or_default())
    }

    /// Waits until no other edit of `definition_id` is running and returns a guard that
    /// releases the definition when dropped.
    pub async fn acquire(&self, definition_id: i64) -> OwnedMutexGuard<()> {
        self.lock_for(definition_id).lock_owned().await
    }

    /// Like [`DefinitionLocks::acquire`] but returns `None` instead of waiting.
    #[cfg(test)]
    #[must_use]
    pub fn try_acquire(&self, definition_id: i64) -> Option<OwnedMutexGuard<()>> {
        self.lock_for(definition_id).try_lock_owned().ok()
    }

    /// Number of definitions currently tracked
    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no definition is tracked
    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
