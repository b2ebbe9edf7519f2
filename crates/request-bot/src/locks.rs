//! Per-request serialization of read-modify-write passes

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

type LockMap = Arc<Mutex<HashMap<u64, Arc<tokio::sync::Mutex<()>>>>>;

/// Keyed async mutex over request message ids.
///
/// A pass that fetches, merges and edits a request holds the request's lock
/// for the whole sequence, so two annotations of the same request never read
/// the same snapshot. Entries are removed once nobody holds or awaits them.
#[derive(Clone, Default)]
pub struct RequestLocks {
    locks: LockMap,
}

/// Held lock on one request; released on drop
pub struct RequestGuard {
    request_id: u64,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
}

impl RequestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, request_id: u64) -> RequestGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(request_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        RequestGuard {
            request_id,
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    /// Number of requests with a live lock entry
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map's own reference left: no holder, no waiter
        if locks
            .get(&self.request_id)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            locks.remove(&self.request_id);
        }
    }
}
