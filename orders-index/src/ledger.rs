//! Per-order record-count bookkeeping.
//!
//! The remote address space is positional and cannot be enumerated, so the
//! plugin persists how many records it last wrote for each order. That
//! count is what the next sync uses to compute which addresses may hold
//! stale records.

use std::sync::Arc;

use tracing::warn;

use crate::errors::SyncError;
use crate::host::OrderMetadataStore;

/// Tracks how many records were last written per order.
///
/// Counts are stored in the order's own metadata under
/// `"{index_name}_records_count"`, written immediately on every sync.
/// Invariant: after a successful sync the stored count equals the number of
/// records present remotely for that order.
///
/// Read failures and write failures both abort the sync attempt: with an
/// unknown or unrecorded count, the next stale-address computation would be
/// wrong and trailing records could leak forever.
pub struct RecordCountLedger {
    store: Arc<dyn OrderMetadataStore>,
    meta_key: String,
}

impl RecordCountLedger {
    /// Create a ledger persisting through the given metadata store.
    pub fn new(store: Arc<dyn OrderMetadataStore>, index_name: &str) -> Self {
        Self {
            store,
            meta_key: format!("{}_records_count", index_name),
        }
    }

    /// The metadata key the counts are stored under.
    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    /// Number of records last written for the order. 0 when never synced.
    pub async fn records_count(&self, order_id: u64) -> Result<u32, SyncError> {
        let raw = self
            .store
            .meta(order_id, &self.meta_key)
            .await
            .map_err(|e| SyncError::ledger(format!("Failed to read records count: {}", e)))?;

        match raw {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(count) => Ok(count),
                Err(_) => {
                    warn!(
                        order_id = order_id,
                        value = %value,
                        "Unparsable records count annotation, treating as 0"
                    );
                    Ok(0)
                }
            },
            None => Ok(0),
        }
    }

    /// Persist the number of records just written for the order.
    pub async fn set_records_count(&self, order_id: u64, count: u32) -> Result<(), SyncError> {
        self.store
            .set_meta(order_id, &self.meta_key, &count.to_string())
            .await
            .map_err(|e| SyncError::ledger(format!("Failed to persist records count: {}", e)))
    }
}
