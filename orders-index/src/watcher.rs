//! Order change watcher.
//!
//! Dispatches order lifecycle events into the index and shields the host
//! transaction from indexing failures: whatever goes wrong during a sync is
//! logged and dropped, never propagated back to the operation that placed,
//! edited, or deleted the order.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info};

use crate::events::{OrderEvent, OrderEventKind};
use crate::host::OrderStore;
use crate::index::EntityIndex;
use crate::order::Order;

/// Watches order lifecycle events and keeps the index in sync.
///
/// Subscription happens once: the host hands the watcher its event stream
/// via [`OrdersWatcher::run`], or calls the per-event handlers inline from
/// its own hook mechanism. Either way the watcher never returns an error;
/// indexing is strictly best-effort from the host's point of view.
pub struct OrdersWatcher {
    index: Arc<dyn EntityIndex>,
    store: Arc<dyn OrderStore>,
}

impl OrdersWatcher {
    /// Create a watcher for the given index.
    ///
    /// The order store is only used to re-resolve the typed order behind
    /// the legacy content-deletion signal.
    pub fn new(index: Arc<dyn EntityIndex>, store: Arc<dyn OrderStore>) -> Self {
        Self { index, store }
    }

    /// Consume lifecycle events until the stream ends or shutdown fires.
    ///
    /// Events are processed sequentially in arrival order.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<OrderEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!(index = %self.index.index_name(), "Watching order lifecycle events");

        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle(event).await,
                        None => {
                            info!("Order event stream ended");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Handle one lifecycle event.
    pub async fn handle(&self, event: OrderEvent) {
        if event.autosave {
            // No indexing work inside autosave requests.
            debug!("Skipping order event fired during autosave");
            return;
        }

        match event.kind {
            OrderEventKind::MetaSaved(order) | OrderEventKind::Created(order) => {
                self.sync_item(&order).await;
            }
            OrderEventKind::BeforeDelete(order) => {
                self.delete_item(&order).await;
            }
            OrderEventKind::ContentDeleted(order_id) => {
                // The legacy signal carries only a raw id; resolve the
                // typed order before proceeding.
                match self.store.order(order_id).await {
                    Ok(Some(order)) => self.delete_item(&order).await,
                    Ok(None) => {
                        debug!(order_id = order_id, "Deleted content is not an order, skipping");
                    }
                    Err(e) => {
                        error!(
                            order_id = order_id,
                            error = %e,
                            "Failed to resolve order for legacy deletion signal"
                        );
                    }
                }
            }
        }
    }

    /// Sync an order, logging instead of propagating failures.
    pub async fn sync_item(&self, order: &Order) {
        if !self.index.supports(order) {
            debug!(order_id = order.id, "Entity not supported by the orders index");
            return;
        }

        if let Err(e) = self.index.sync(order).await {
            error!(
                order_id = order.id,
                error = %e,
                "Failed to sync order to the search index"
            );
        }
    }

    /// Remove an order's records, logging instead of propagating failures.
    pub async fn delete_item(&self, order: &Order) {
        if !self.index.supports(order) {
            debug!(order_id = order.id, "Entity not supported by the orders index");
            return;
        }

        if let Err(e) = self.index.delete_item(order).await {
            error!(
                order_id = order.id,
                error = %e,
                "Failed to delete order from the search index"
            );
        }
    }
}
