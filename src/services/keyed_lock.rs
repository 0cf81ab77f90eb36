//! Per-key async mutexes.
//!
//! Serializes work on the same movie id or poster filename while letting
//! unrelated keys proceed in parallel. Entries are dropped once the last
//! holder or waiter goes away, so the table only holds keys in use.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct KeyedLock {
    entries: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Released when the guard drops.
    pub async fn lock(&self, key: impl Into<String>) -> KeyGuard {
        let key = key.into();
        let mutex = self.entries.entry(key.clone()).or_default().clone();
        let guard = mutex.lock_owned().await;
        KeyGuard {
            key,
            guard: Some(guard),
            entries: self.entries.clone(),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct KeyGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    entries: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // release first so the strong count only reflects the map and waiters
        self.guard.take();
        self.entries
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
