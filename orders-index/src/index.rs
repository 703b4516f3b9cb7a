//! The orders index synchronizer.
//!
//! Reconciles the remote record set for one order against its current
//! projection: stale positional addresses are deleted before the new
//! records are written, and the per-order record count is persisted last.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::errors::SyncError;
use crate::ledger::RecordCountLedger;
use crate::locks::EntityLocks;
use crate::order::{Order, OrderKind};
use crate::projector::OrderProjector;
use orders_index_repository::{SearchIndexError, SearchIndexService};
use orders_index_shared::OrderRecord;

/// The host-facing contract of an entity index.
///
/// The watcher depends on this trait rather than on the concrete orders
/// index, matching how the host framework treats its registered indices.
#[async_trait]
pub trait EntityIndex: Send + Sync {
    /// The index name, also used to scope the record-count metadata key.
    fn index_name(&self) -> &str;

    /// Cheap check whether the entity can be subject to indexing at all.
    ///
    /// Called synchronously on every lifecycle event; must not do I/O.
    fn supports(&self, order: &Order) -> bool;

    /// Bring the remote record set in line with the order's current state.
    async fn sync(&self, order: &Order) -> Result<(), SyncError>;

    /// Remove all of the order's records from the remote index.
    async fn delete_item(&self, order: &Order) -> Result<(), SyncError>;
}

/// Decides whether a stale-record delete should block until it is visible
/// to searches before the subsequent write proceeds.
///
/// The default is fire-and-forget: the delete call is issued and the sync
/// moves on. Callers that verify index contents right after a sync can
/// inject a policy returning true to get read-after-write consistency.
pub trait WaitPolicy: Send + Sync {
    fn should_wait(&self, order: &Order, new_records: &[OrderRecord]) -> bool;
}

/// Default policy: never block on delete visibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWait;

impl WaitPolicy for NoWait {
    fn should_wait(&self, _order: &Order, _new_records: &[OrderRecord]) -> bool {
        false
    }
}

/// The orders search index.
///
/// Owns the projector, the record-count ledger, and the validated service
/// handle to the remote index. All operations for one order id are
/// serialized through a keyed lock; operations on distinct orders run
/// concurrently.
pub struct OrdersIndex {
    name: String,
    projector: OrderProjector,
    ledger: RecordCountLedger,
    service: Arc<SearchIndexService>,
    locks: EntityLocks,
    wait_policy: Box<dyn WaitPolicy>,
}

impl OrdersIndex {
    /// Create the orders index.
    pub fn new(
        name: impl Into<String>,
        projector: OrderProjector,
        ledger: RecordCountLedger,
        service: Arc<SearchIndexService>,
    ) -> Self {
        Self {
            name: name.into(),
            projector,
            ledger,
            service,
            locks: EntityLocks::new(),
            wait_policy: Box::new(NoWait),
        }
    }

    /// Replace the wait policy.
    pub fn with_wait_policy(mut self, wait_policy: Box<dyn WaitPolicy>) -> Self {
        self.wait_policy = wait_policy;
        self
    }

    /// Delete the candidate stale addresses `{id}-0 .. {id}-(old_count-1)`.
    ///
    /// The address space is positional: these are all the addresses a
    /// previous sync may have written. Some may hold no record anymore,
    /// which the service treats as a successful no-op.
    async fn purge_stale(
        &self,
        order_id: u64,
        old_count: u32,
        wait: bool,
    ) -> Result<(), SyncError> {
        let addresses: Vec<String> = (0..old_count)
            .map(|record_index| OrderRecord::record_address(order_id, record_index))
            .collect();

        if addresses.is_empty() {
            return Ok(());
        }

        debug!(
            order_id = order_id,
            stale_count = addresses.len(),
            wait = wait,
            "Deleting candidate stale records"
        );
        self.service.delete_records(&addresses, wait).await?;
        Ok(())
    }
}

#[async_trait]
impl EntityIndex for OrdersIndex {
    fn index_name(&self) -> &str {
        &self.name
    }

    fn supports(&self, order: &Order) -> bool {
        order.kind == OrderKind::Standard
    }

    /// Reconcile the remote record set with the order's current state.
    ///
    /// Deletes run before writes: with positional addressing, a projection
    /// that shrank would otherwise leave its trailing addresses live in the
    /// index forever. The record count is persisted only after both remote
    /// phases succeed, so a failed sync leaves the previous count (and the
    /// previous stale-address range) in place for the next attempt.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    async fn sync(&self, order: &Order) -> Result<(), SyncError> {
        let _guard = self.locks.acquire(order.id).await;

        let records = self.projector.project(order);
        let old_count = self.ledger.records_count(order.id).await?;
        let wait = self.wait_policy.should_wait(order, &records);

        self.purge_stale(order.id, old_count, wait).await?;

        if !records.is_empty() {
            let summary = self.service.save_records(&records).await?;
            if !summary.all_succeeded() {
                return Err(SyncError::Remote(SearchIndexError::bulk_index(format!(
                    "{} of {} records failed to write",
                    summary.failed, summary.total
                ))));
            }
        }

        self.ledger
            .set_records_count(order.id, records.len() as u32)
            .await?;

        debug!(
            order_id = order.id,
            records = records.len(),
            previous = old_count,
            "Order synced"
        );
        Ok(())
    }

    /// Remove all of the order's records, idempotently.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    async fn delete_item(&self, order: &Order) -> Result<(), SyncError> {
        let _guard = self.locks.acquire(order.id).await;

        let old_count = self.ledger.records_count(order.id).await?;
        let wait = self.wait_policy.should_wait(order, &[]);

        self.purge_stale(order.id, old_count, wait).await?;

        if old_count > 0 {
            self.ledger.set_records_count(order.id, 0).await?;
        }

        debug!(order_id = order.id, previous = old_count, "Order removed");
        Ok(())
    }
}
