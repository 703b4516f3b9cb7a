//! Order lifecycle event types.
//!
//! Defines the events the host platform delivers to the watcher. Three
//! signals carry the typed order; the legacy content-deletion signal only
//! carries a raw identifier and is re-resolved before use.

use crate::order::Order;

/// The lifecycle signal an event represents.
#[derive(Debug, Clone)]
pub enum OrderEventKind {
    /// Order was saved from the admin screen.
    MetaSaved(Order),
    /// A new order was created.
    Created(Order),
    /// Order is about to be deleted.
    BeforeDelete(Order),
    /// Legacy generic content-deletion signal. Carries only the raw
    /// identifier; the typed order must be re-resolved from the host.
    ContentDeleted(u64),
}

/// An order lifecycle event as delivered by the host platform.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub kind: OrderEventKind,
    /// True when the signal fired inside a bulk/background autosave
    /// request. No indexing work runs for autosave events.
    pub autosave: bool,
}

impl OrderEvent {
    /// Create a meta-saved event.
    pub fn meta_saved(order: Order) -> Self {
        Self {
            kind: OrderEventKind::MetaSaved(order),
            autosave: false,
        }
    }

    /// Create an order-created event.
    pub fn created(order: Order) -> Self {
        Self {
            kind: OrderEventKind::Created(order),
            autosave: false,
        }
    }

    /// Create a before-delete event.
    pub fn before_delete(order: Order) -> Self {
        Self {
            kind: OrderEventKind::BeforeDelete(order),
            autosave: false,
        }
    }

    /// Create a legacy content-deleted event from a raw identifier.
    pub fn content_deleted(order_id: u64) -> Self {
        Self {
            kind: OrderEventKind::ContentDeleted(order_id),
            autosave: false,
        }
    }

    /// Mark this event as fired during an autosave request.
    pub fn with_autosave(mut self) -> Self {
        self.autosave = true;
        self
    }
}
