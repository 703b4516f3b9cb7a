//! Per-order serialization of index operations.
//!
//! Two concurrent syncs of the same order can interleave their
//! delete/write/count steps and leave the ledger disagreeing with the
//! remote state. A keyed async lock serializes operations per order id
//! while distinct orders proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async locks, one per order id.
///
/// Lock entries are created on first use and removed again once no caller
/// holds or awaits them, so the map does not grow with the number of orders
/// ever synced.
#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for an order id, waiting if another operation on
    /// the same order is in flight.
    pub async fn acquire(&self, order_id: u64) -> EntityGuard<'_> {
        let entry = {
            let mut locks = self.locks.lock().unwrap();
            Arc::clone(locks.entry(order_id).or_default())
        };

        let guard = entry.lock_owned().await;
        EntityGuard {
            locks: self,
            order_id,
            _guard: guard,
        }
    }

    /// Number of live lock entries. Exposed for tests.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

/// Guard holding the per-order lock until dropped.
pub struct EntityGuard<'a> {
    locks: &'a EntityLocks,
    order_id: u64,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for EntityGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock().unwrap();
        if let Some(entry) = locks.get(&self.order_id) {
            // Two strong references mean only the map and this guard hold
            // the entry: no other task is waiting on it.
            if Arc::strong_count(entry) == 2 {
                locks.remove(&self.order_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_order_operations_serialize() {
        let locks = Arc::new(EntityLocks::new());
        let in_section = Arc::new(AtomicU32::new(0));
        let max_seen = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let in_section = Arc::clone(&in_section);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(42).await;
                let now = in_section.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_orders_do_not_block_each_other() {
        let locks = EntityLocks::new();

        let _first = locks.acquire(1).await;
        // Acquiring a different order id must not deadlock while the first
        // guard is held.
        let _second = locks.acquire(2).await;
    }

    #[tokio::test]
    async fn test_entries_are_cleaned_up() {
        let locks = EntityLocks::new();

        {
            let _guard = locks.acquire(42).await;
            assert_eq!(locks.len(), 1);
        }
        assert_eq!(locks.len(), 0);
    }
}
