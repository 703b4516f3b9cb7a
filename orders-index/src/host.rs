//! Contracts the host platform implements for the plugin.
//!
//! The host framework owns orders, their metadata, and all localization.
//! The plugin depends on these traits instead of concrete host types so the
//! core logic can be exercised against in-memory implementations in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::HostError;
use crate::order::Order;

/// Read access to orders by identifier.
///
/// Used by the watcher to re-resolve the typed order behind the legacy
/// content-deletion signal.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetch an order by id. `Ok(None)` when no such order exists (or the
    /// identifier refers to content that is not an order).
    async fn order(&self, order_id: u64) -> Result<Option<Order>, HostError>;
}

/// Read/write access to an order's metadata entries.
///
/// The record-count ledger persists through this store; writes must be
/// applied immediately, not deferred to the end of the host request.
#[async_trait]
pub trait OrderMetadataStore: Send + Sync {
    /// Read a metadata value. `Ok(None)` when the key was never set.
    async fn meta(&self, order_id: u64, key: &str) -> Result<Option<String>, HostError>;

    /// Write a metadata value, overwriting any previous value.
    async fn set_meta(&self, order_id: u64, key: &str, value: &str) -> Result<(), HostError>;
}

/// Host-side display lookups used during projection.
///
/// These are synchronous: the host resolves them from in-memory
/// configuration (status labels, country tables, locale formats).
pub trait PlatformLookups: Send + Sync {
    /// Whether the commerce module is available at all. When it is not,
    /// orders project to nothing and disappear from the index.
    fn commerce_enabled(&self) -> bool {
        true
    }

    /// Human-readable name for a status slug (e.g. "processing" ->
    /// "Processing").
    fn order_status_name(&self, status: &str) -> String;

    /// Display name for an ISO country code; implementations should return
    /// the code itself when it is unknown.
    fn country_name(&self, code: &str) -> String;

    /// Format a timestamp with the host's configured date format.
    fn format_date(&self, date: &DateTime<Utc>) -> String;

    /// Format a monetary amount with the host's currency settings.
    fn format_amount(&self, amount: f64) -> String;
}
