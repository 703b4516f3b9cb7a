//! Search index service implementation.
//!
//! This module provides the validating facade over a `SearchIndexProvider`.
//! The synchronizer and the admin search backend both go through this
//! service rather than talking to a provider directly.

use std::sync::Arc;

use crate::config::SearchIndexServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::BatchOperationSummary;
use crate::utils::parse_record_address;
use orders_index_shared::{OrderRecord, OrderSearchResponse, SearchQuery};

/// The high-level API for the orders search index.
///
/// Validates inputs (record addresses, batch sizes, query parameters) and
/// delegates the actual backend operations to an injected
/// [`SearchIndexProvider`], so backends can be swapped and tests can use
/// mock implementations.
pub struct SearchIndexService {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexServiceConfig,
}

impl SearchIndexService {
    /// Create a new service with default configuration.
    ///
    /// The default configuration limits batches to 1000 items.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexServiceConfig::default(),
        }
    }

    /// Create a new service with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        config: SearchIndexServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    /// Ensure the backing index exists. Called once at startup.
    pub async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        self.provider.ensure_index_exists().await
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchIndexError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchIndexError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Write records to the index, keyed by their positional addresses.
    ///
    /// Every record's `object_id` must be a well-formed address whose order
    /// id component matches the record's `id` field; a mismatch would write
    /// a record into another order's address space.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-address results; partial failures
    ///   are reported in the summary rather than failing the whole batch
    /// * `Err(SearchIndexError::ValidationError)` - If any address is malformed
    /// * `Err(SearchIndexError::BatchSizeExceeded)` - If the batch is too large
    pub async fn save_records(
        &self,
        records: &[OrderRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if records.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        self.validate_batch_size(records.len())?;

        for record in records {
            let (order_id, _) = parse_record_address(&record.object_id)?;
            if order_id != record.id {
                return Err(SearchIndexError::validation(format!(
                    "Record address '{}' does not belong to order {}",
                    record.object_id, record.id
                )));
            }
        }

        self.provider.save_records(records).await
    }

    /// Delete the records at the given addresses.
    ///
    /// Addresses that hold no record succeed silently; the synchronizer
    /// deletes candidate stale addresses without knowing which ones exist.
    /// When `wait` is true the call blocks until the deletions are visible
    /// to searches.
    pub async fn delete_records(
        &self,
        addresses: &[String],
        wait: bool,
    ) -> Result<(), SearchIndexError> {
        if addresses.is_empty() {
            return Ok(());
        }

        self.validate_batch_size(addresses.len())?;

        for address in addresses {
            parse_record_address(address)?;
        }

        self.provider.delete_records(addresses, wait).await
    }

    /// Execute a free-text search over the indexed records.
    pub async fn search(&self, query: &SearchQuery) -> Result<OrderSearchResponse, SearchIndexError> {
        query.validate().map_err(SearchIndexError::validation)?;
        self.provider.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchOperationResult;
    use async_trait::async_trait;
    use orders_index_shared::AddressBlock;
    use std::sync::Mutex;

    /// Mock provider recording the requests it receives.
    struct MockProvider {
        saved: Mutex<Vec<OrderRecord>>,
        deleted: Mutex<Vec<(Vec<String>, bool)>>,
        should_fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn save_records(
            &self,
            records: &[OrderRecord],
        ) -> Result<BatchOperationSummary, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::bulk_index("Mock failure"));
            }
            self.saved.lock().unwrap().extend_from_slice(records);
            Ok(BatchOperationSummary {
                total: records.len(),
                succeeded: records.len(),
                failed: 0,
                results: records
                    .iter()
                    .map(|r| BatchOperationResult {
                        address: r.object_id.clone(),
                        success: true,
                        error: None,
                    })
                    .collect(),
            })
        }

        async fn delete_records(
            &self,
            addresses: &[String],
            wait: bool,
        ) -> Result<(), SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::delete("Mock failure"));
            }
            self.deleted
                .lock()
                .unwrap()
                .push((addresses.to_vec(), wait));
            Ok(())
        }

        async fn search(
            &self,
            _query: &SearchQuery,
        ) -> Result<OrderSearchResponse, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::search("Mock failure"));
            }
            Ok(OrderSearchResponse::empty())
        }
    }

    fn test_record(order_id: u64, record_index: u32) -> OrderRecord {
        OrderRecord {
            object_id: OrderRecord::record_address(order_id, record_index),
            id: order_id,
            kind: "shop_order".to_string(),
            number: order_id.to_string(),
            status: "processing".to_string(),
            status_name: "Processing".to_string(),
            date_timestamp: 1_700_000_000,
            date_formatted: "November 14, 2023".to_string(),
            order_total: 10.0,
            formatted_order_total: "$10.00".to_string(),
            items_count: 0,
            payment_method_title: String::new(),
            shipping_method_title: String::new(),
            customer: None,
            billing: AddressBlock::default(),
            shipping: AddressBlock::default(),
            items: vec![],
        }
    }

    #[tokio::test]
    async fn test_save_records_empty() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new()));
        let summary = service.save_records(&[]).await.unwrap();
        assert_eq!(summary.total, 0);
        assert!(summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_save_records_delegates() {
        let provider = Arc::new(MockProvider::new());
        let service = SearchIndexService::new(provider.clone());

        let records = vec![test_record(42, 0), test_record(43, 0)];
        let summary = service.save_records(&records).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(provider.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_records_rejects_mismatched_address() {
        let provider = Arc::new(MockProvider::new());
        let service = SearchIndexService::new(provider.clone());

        let mut record = test_record(42, 0);
        record.object_id = OrderRecord::record_address(99, 0);

        let result = service.save_records(&[record]).await;
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
        assert!(provider.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_records_empty_is_noop() {
        let provider = Arc::new(MockProvider::new());
        let service = SearchIndexService::new(provider.clone());

        service.delete_records(&[], false).await.unwrap();
        assert!(provider.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_records_passes_wait_flag() {
        let provider = Arc::new(MockProvider::new());
        let service = SearchIndexService::new(provider.clone());

        let addresses = vec!["42-0".to_string(), "42-1".to_string()];
        service.delete_records(&addresses, true).await.unwrap();

        let deleted = provider.deleted.lock().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].0, addresses);
        assert!(deleted[0].1);
    }

    #[tokio::test]
    async fn test_delete_records_rejects_malformed_address() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new()));
        let result = service
            .delete_records(&["not-an-address-x".to_string()], false)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn test_batch_size_limit() {
        let service = SearchIndexService::with_config(
            Arc::new(MockProvider::new()),
            SearchIndexServiceConfig::with_max_batch_size(1),
        );

        let records = vec![test_record(1, 0), test_record(2, 0)];
        let result = service.save_records(&records).await;
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::BatchSizeExceeded { provided: 2, max: 1 }
        ));
    }

    #[tokio::test]
    async fn test_batch_size_unlimited() {
        let service = SearchIndexService::with_config(
            Arc::new(MockProvider::new()),
            SearchIndexServiceConfig::unlimited(),
        );

        let records: Vec<OrderRecord> = (1..=2000).map(|i| test_record(i, 0)).collect();
        let summary = service.save_records(&records).await.unwrap();
        assert_eq!(summary.total, 2000);
    }

    #[tokio::test]
    async fn test_search_validates_query() {
        let service = SearchIndexService::new(Arc::new(MockProvider::new()));
        let result = service.search(&SearchQuery::new("   ")).await;
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let service = SearchIndexService::new(Arc::new(MockProvider::failing()));
        let result = service.save_records(&[test_record(1, 0)]).await;
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::BulkIndexError(_)
        ));
    }
}
