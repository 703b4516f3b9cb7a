//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and field mappings for the orders
//! search index.

use serde_json::{json, Value};

/// The default alias of the orders search index.
pub const DEFAULT_INDEX_ALIAS: &str = "orders";

/// Configuration for the orders search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The alias name used for all read/write operations.
    pub alias: String,
    /// The version number of the physical index (e.g. 0 for "orders_v0").
    pub version: u32,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name
    /// * `version` - The version number
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
        }
    }

    /// The versioned physical index name behind the alias
    /// (e.g. "orders_v0").
    pub fn physical_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_ALIAS, 0)
    }
}

/// Get the index settings and mappings for the orders search index.
///
/// The mapping mirrors how admins search orders:
///
/// - **search_as_you_type** on the order number and the customer, billing
///   and shipping display names for autocomplete behavior.
/// - **keyword** on identifier-like fields (record address, status slug,
///   SKU, phone, postcode) where fuzzy matching would surface wrong orders.
/// - **date_timestamp** stored as an epoch-seconds date, the default
///   descending sort key so recent orders rank first.
/// - Display-only fields (formatted date and total) stored but not indexed.
pub fn index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "object_id": { "type": "keyword" },
                "id": { "type": "long" },
                "kind": { "type": "keyword" },
                "number": {
                    "type": "search_as_you_type",
                    "fields": {
                        "raw": { "type": "keyword" }
                    }
                },
                "status": { "type": "keyword" },
                "status_name": { "type": "text" },
                "date_timestamp": {
                    "type": "date",
                    "format": "epoch_second"
                },
                "date_formatted": { "type": "keyword", "index": false },
                "order_total": { "type": "double" },
                "formatted_order_total": { "type": "keyword", "index": false },
                "items_count": { "type": "integer" },
                "payment_method_title": { "type": "text" },
                "shipping_method_title": { "type": "text" },
                "customer": {
                    "properties": {
                        "id": { "type": "long" },
                        "display_name": { "type": "search_as_you_type" },
                        "email": { "type": "text" }
                    }
                },
                "billing": { "properties": address_block_mapping() },
                "shipping": { "properties": address_block_mapping() },
                "items": {
                    "properties": {
                        "id": { "type": "long" },
                        "name": { "type": "text" },
                        "qty": { "type": "integer" },
                        "sku": { "type": "keyword" }
                    }
                }
            }
        }
    })
}

/// Field mapping shared by the billing and shipping blocks.
fn address_block_mapping() -> Value {
    json!({
        "display_name": { "type": "search_as_you_type" },
        "email": { "type": "text" },
        "phone": { "type": "keyword" },
        "company": { "type": "text" },
        "address_1": { "type": "text" },
        "address_2": { "type": "text" },
        "city": { "type": "text" },
        "state": { "type": "text" },
        "postcode": { "type": "keyword" },
        "country": { "type": "text" }
    })
}
