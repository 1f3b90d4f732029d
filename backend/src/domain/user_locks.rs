//! Per-user mutation locks.
//!
//! Every mutation whose precondition reads a user's aggregate (toggle
//! check-in, contact/location create and delete, trip create and update,
//! account deletion) holds that user's lock across the read-check-write.
//! Reads never lock, and nothing holds a lock across a notification send.
//!
//! Slots live only while someone holds or waits on them; the last one out
//! removes the entry, so lookups for unknown users leave nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::UserId;

type Slot = Arc<AsyncMutex<()>>;
type SlotMap = Arc<Mutex<HashMap<UserId, Slot>>>;

/// Map of async mutexes keyed by user.
#[derive(Debug, Default, Clone)]
pub struct UserLocks {
    inner: SlotMap,
}

/// Guard returned by [`UserLocks::lock`]; the lock is released on drop.
#[derive(Debug)]
pub struct UserLockGuard {
    // Field order matters: the mutex guard must drop before the lease so the
    // lease sees the final reference count.
    _guard: OwnedMutexGuard<()>,
    _lease: SlotLease,
}

/// One holder's claim on a slot. Dropping the last lease prunes the entry.
#[derive(Debug)]
struct SlotLease {
    map: SlotMap,
    user_id: UserId,
    slot: Slot,
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        // The map and this lease are the only owners left.
        let idle = map
            .get(&self.user_id)
            .is_some_and(|slot| Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2);
        if idle {
            map.remove(&self.user_id);
        }
    }
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s aggregate.
    ///
    /// Cancelling the wait releases the slot like dropping a guard does.
    pub async fn lock(&self, user_id: UserId) -> UserLockGuard {
        let lease = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            SlotLease {
                map: Arc::clone(&self.inner),
                user_id,
                slot: Arc::clone(map.entry(user_id).or_default()),
            }
        };
        let guard = Arc::clone(&lease.slot).lock_owned().await;
        UserLockGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
