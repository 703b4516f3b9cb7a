//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesPutAliasParts},
    params::Refresh,
    DeleteParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{index_settings, IndexConfig};
use crate::types::{BatchOperationResult, BatchOperationSummary};
use orders_index_shared::{OrderHit, OrderRecord, OrderSearchResponse, SearchQuery};

/// Fields queried by the free-text order search.
///
/// Mirrors the searchable attributes of a record: order number (with its
/// autocomplete subfields), status name, customer, both address blocks, and
/// line-item SKUs.
const SEARCH_FIELDS: &[&str] = &[
    "number",
    "number._2gram",
    "number._3gram",
    "status_name",
    "customer.display_name",
    "customer.email",
    "billing.display_name",
    "billing.email",
    "billing.phone",
    "billing.company",
    "billing.address_1",
    "billing.address_2",
    "billing.city",
    "billing.state",
    "billing.postcode",
    "billing.country",
    "shipping.display_name",
    "shipping.company",
    "shipping.address_1",
    "shipping.address_2",
    "shipping.city",
    "shipping.state",
    "shipping.postcode",
    "shipping.country",
    "items.sku",
];

/// OpenSearch-backed search index for order records.
///
/// Records are written with `_id` set to their positional address, so a
/// rewrite at the same address overwrites in place and a delete by address
/// removes exactly one record slot.
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Write a single record, keyed by its address.
    async fn save_record(&self, record: &OrderRecord) -> Result<(), SearchIndexError> {
        let body = serde_json::to_value(record)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let response = self
            .client
            .index(IndexParts::IndexId(
                &self.index_config.alias,
                &record.object_id,
            ))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchIndexError::index(format!(
                "Write failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(address = %record.object_id, "Record written");
        Ok(())
    }

    /// Delete a single record slot. A missing record is not an error.
    async fn delete_record(&self, address: &str, wait: bool) -> Result<(), SearchIndexError> {
        let mut request = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.alias, address));
        if wait {
            request = request.refresh(Refresh::WaitFor);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the address may never have held a record
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(address = %address, "Record deleted");
        Ok(())
    }

    /// Build the search request body for a query.
    fn search_body(query: &SearchQuery) -> Value {
        let mut body = json!({
            "from": query.offset(),
            "size": query.hits_per_page,
            "query": {
                "multi_match": {
                    "query": query.text,
                    "type": "bool_prefix",
                    "lenient": true,
                    "fields": SEARCH_FIELDS
                }
            },
            "sort": [
                { "_score": { "order": "desc" } },
                { "date_timestamp": { "order": "desc" } }
            ]
        });

        if query.highlight_number {
            body["highlight"] = json!({ "fields": { "number": {} } });
        }

        body
    }

    /// Convert a raw OpenSearch hit into an [`OrderHit`].
    fn parse_hit(hit: &Value) -> Result<OrderHit, SearchIndexError> {
        let record: OrderRecord = serde_json::from_value(hit["_source"].clone())
            .map_err(|e| SearchIndexError::parse(format!("Malformed stored record: {}", e)))?;

        let number_highlight = hit["highlight"]["number"]
            .as_array()
            .and_then(|fragments| fragments.first())
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(OrderHit {
            record,
            relevance_score: hit["_score"].as_f64().unwrap_or(0.0),
            number_highlight,
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Ensure the physical index and its alias exist.
    ///
    /// Looks up the alias first; when absent, creates the versioned physical
    /// index with the order mappings and points the alias at it.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let alias = self.index_config.alias.as_str();

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(alias = %alias, "Search index already exists");
            return Ok(());
        }

        let physical_name = self.index_config.physical_name();
        info!(
            index = %physical_name,
            alias = %alias,
            "Creating orders search index"
        );

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&physical_name))
            .body(index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(
                &[physical_name.as_str()],
                alias,
            ))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::index_creation(format!(
                "Alias creation failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn save_records(
        &self,
        records: &[OrderRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let mut results = Vec::with_capacity(records.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for record in records {
            match self.save_record(record).await {
                Ok(()) => {
                    succeeded += 1;
                    results.push(BatchOperationResult {
                        address: record.object_id.clone(),
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    results.push(BatchOperationResult {
                        address: record.object_id.clone(),
                        success: false,
                        error: Some(e),
                    });
                }
            }
        }

        Ok(BatchOperationSummary {
            total: records.len(),
            succeeded,
            failed,
            results,
        })
    }

    async fn delete_records(
        &self,
        addresses: &[String],
        wait: bool,
    ) -> Result<(), SearchIndexError> {
        for address in addresses {
            self.delete_record(address, wait).await?;
        }
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<OrderSearchResponse, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index_config.alias.as_str()]))
            .body(Self::search_body(query))
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let hits = body["hits"]["hits"]
            .as_array()
            .map(|raw_hits| {
                raw_hits
                    .iter()
                    .map(Self::parse_hit)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(OrderSearchResponse {
            hits,
            total: body["hits"]["total"]["value"].as_u64().unwrap_or(0),
            took_ms: body["took"].as_u64().unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body_defaults() {
        let query = SearchQuery::new("1042");
        let body = OpenSearchProvider::search_body(&query);

        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 7);
        assert_eq!(body["query"]["multi_match"]["query"], "1042");
        assert_eq!(body["query"]["multi_match"]["type"], "bool_prefix");
        assert!(body["highlight"]["fields"]["number"].is_object());

        // Recency is the tie breaker after relevance.
        assert_eq!(body["sort"][1]["date_timestamp"]["order"], "desc");
    }

    #[test]
    fn test_search_body_pagination_and_no_highlight() {
        let query = SearchQuery::new("jane")
            .with_page(2)
            .with_hits_per_page(10)
            .without_highlight();
        let body = OpenSearchProvider::search_body(&query);

        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 10);
        assert!(body.get("highlight").is_none());
    }

    #[test]
    fn test_parse_hit() {
        let raw = json!({
            "_score": 2.25,
            "_source": {
                "object_id": "42-0",
                "id": 42,
                "kind": "shop_order",
                "number": "42",
                "status": "processing",
                "status_name": "Processing",
                "date_timestamp": 1_700_000_000i64,
                "date_formatted": "November 14, 2023",
                "order_total": 59.9,
                "formatted_order_total": "$59.90",
                "items_count": 1,
                "payment_method_title": "Credit card",
                "shipping_method_title": "Flat rate",
                "billing": {
                    "display_name": "Jane Doe",
                    "company": "",
                    "address_1": "1 Main St",
                    "address_2": "",
                    "city": "Portland",
                    "state": "OR",
                    "postcode": "97201",
                    "country": "United States (US)"
                },
                "shipping": {
                    "display_name": "Jane Doe",
                    "company": "",
                    "address_1": "1 Main St",
                    "address_2": "",
                    "city": "Portland",
                    "state": "OR",
                    "postcode": "97201",
                    "country": "United States (US)"
                },
                "items": []
            },
            "highlight": { "number": ["<em>42</em>"] }
        });

        let hit = OpenSearchProvider::parse_hit(&raw).unwrap();
        assert_eq!(hit.record.object_id, "42-0");
        assert_eq!(hit.relevance_score, 2.25);
        assert_eq!(hit.number_highlight.as_deref(), Some("<em>42</em>"));
    }

    #[test]
    fn test_parse_hit_malformed_source() {
        let raw = json!({ "_score": 1.0, "_source": { "object_id": "42-0" } });
        let result = OpenSearchProvider::parse_hit(&raw);
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ParseError(_)
        ));
    }
}
