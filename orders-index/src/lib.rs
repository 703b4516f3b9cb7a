//! # Orders Index
//!
//! Core of the orders search indexer: projects orders into flat search
//! records and keeps the remote index in sync with order lifecycle events
//! delivered by the host platform.
//!
//! ## Architecture
//!
//! Synchronization follows the Watcher-Projector-Index pattern:
//!
//! 1. **Watcher**: Receives order lifecycle events from the host and
//!    shields the host transaction from indexing failures
//! 2. **Projector**: Transforms an order into zero or more records
//! 3. **Index**: Reconciles the remote record set against the projection
//!    (delete stale positional addresses, write new records, persist the
//!    record count)
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`events`]: Order lifecycle event types
//! - [`host`]: Contracts the host platform implements for the plugin
//! - [`index`]: The synchronizer and its host-facing trait
//! - [`ledger`]: Per-order record-count bookkeeping
//! - [`order`]: Order domain types as consumed by the plugin
//! - [`projector`]: Transforms orders into records
//! - [`watcher`]: Dispatches lifecycle events into the index
//! - [`errors`]: Error types for the synchronizer

pub mod config;
pub mod errors;
pub mod events;
pub mod host;
pub mod index;
pub mod ledger;
pub mod locks;
pub mod order;
pub mod projector;
pub mod watcher;

pub use config::Dependencies;
pub use errors::SyncError;
pub use index::{EntityIndex, OrdersIndex};
pub use watcher::OrdersWatcher;

use thiserror::Error;

/// Errors that can occur during plugin initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Synchronization error.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
