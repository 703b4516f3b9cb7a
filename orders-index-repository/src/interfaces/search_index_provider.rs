//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch,
//! Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;
use orders_index_shared::{OrderRecord, OrderSearchResponse, SearchQuery};

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `SearchIndexService` to enable
/// dependency injection and easy testing with mock implementations.
///
/// # Note on addressing
///
/// Records are keyed by their positional address (`OrderRecord::object_id`,
/// `"{order_id}-{record_index}"`). Writing a record at an existing address
/// overwrites it in place; there is no separate create operation. Deleting
/// an address that holds no record is a successful no-op: the synchronizer
/// routinely deletes candidate stale addresses that may never have existed.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index and any required aliases exist, creating
    /// them if necessary.
    ///
    /// Should be called once during startup, before any record operations.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Write records to the index, keyed by their addresses.
    ///
    /// Each record is written independently; the summary reports which
    /// addresses succeeded and which failed.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Aggregate statistics and per-address results
    /// * `Err(SearchIndexError)` - If the operation fails entirely
    async fn save_records(
        &self,
        records: &[OrderRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Delete the records at the given addresses.
    ///
    /// Addresses that hold no record are treated as successfully deleted.
    /// When `wait` is true the call blocks until the deletions are visible
    /// to subsequent searches; the default fire-and-forget mode only waits
    /// for the backend to accept the request.
    async fn delete_records(
        &self,
        addresses: &[String],
        wait: bool,
    ) -> Result<(), SearchIndexError>;

    /// Execute a free-text search over the indexed records.
    async fn search(&self, query: &SearchQuery) -> Result<OrderSearchResponse, SearchIndexError>;
}
