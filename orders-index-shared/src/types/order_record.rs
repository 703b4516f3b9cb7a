//! Order record types for the search index.
//!
//! This module defines the flat document structure that is written to the
//! remote search service, one or more records per order.

use serde::{Deserialize, Serialize};

/// Flat projection of an order as stored in the search index.
///
/// Records are addressed positionally: the `object_id` is
/// `"{order_id}-{record_index}"` where `record_index` is the zero-based
/// position within the set of records produced for the order in a single
/// projection pass. A record has no identity across syncs beyond that
/// address; repeated writes at the same address overwrite in place.
///
/// `date_timestamp` is the default sort key (descending, most recent order
/// first). `billing` and `shipping` share the [`AddressBlock`] shape so
/// consumers can compare the two without special-casing either side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// Positional record address, also used as the remote document id.
    pub object_id: String,
    pub id: u64,
    /// Order kind slug (e.g. "shop_order").
    pub kind: String,
    pub number: String,
    /// Raw status slug (e.g. "processing").
    pub status: String,
    /// Human-readable status resolved through the host platform.
    pub status_name: String,
    /// Creation time as epoch seconds, 0 when the order has no date.
    pub date_timestamp: i64,
    /// Creation time formatted with the host's configured date format.
    pub date_formatted: String,
    pub order_total: f64,
    pub formatted_order_total: String,
    pub items_count: u32,
    pub payment_method_title: String,
    pub shipping_method_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRecord>,
    pub billing: AddressBlock,
    pub shipping: AddressBlock,
    pub items: Vec<LineItemRecord>,
}

impl OrderRecord {
    /// Build the positional record address for an order.
    ///
    /// # Example
    ///
    /// ```
    /// use orders_index_shared::OrderRecord;
    ///
    /// assert_eq!(OrderRecord::record_address(42, 0), "42-0");
    /// ```
    pub fn record_address(order_id: u64, record_index: u32) -> String {
        format!("{}-{}", order_id, record_index)
    }

    /// Labeled billing/shipping lines for presentation.
    ///
    /// Attributes present on both blocks with the same value collapse into a
    /// single combined line; differing values render as two lines labeled
    /// "Billing" and "Shipping". Empty attributes are skipped.
    pub fn destination_lines(&self) -> Vec<String> {
        let billing = self.billing.attributes();
        let shipping = self.shipping.attributes();

        let mut lines = Vec::new();
        for ((label, billing_value), (_, shipping_value)) in billing.into_iter().zip(shipping) {
            match (billing_value, shipping_value) {
                (Some(b), Some(s)) if b == s => lines.push(format!("{}: {}", label, b)),
                (Some(b), Some(s)) => {
                    lines.push(format!("Billing {}: {}", label.to_lowercase(), b));
                    lines.push(format!("Shipping {}: {}", label.to_lowercase(), s));
                }
                (Some(b), None) => lines.push(format!("Billing {}: {}", label.to_lowercase(), b)),
                (None, Some(s)) => lines.push(format!("Shipping {}: {}", label.to_lowercase(), s)),
                (None, None) => {}
            }
        }
        lines
    }
}

/// Customer summary attached to a record when the order has a known user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub id: u64,
    pub display_name: String,
    pub email: String,
}

/// One order line item as projected into a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemRecord {
    pub id: u64,
    pub name: String,
    pub qty: u32,
    /// Product SKU, empty when the product no longer resolves.
    pub sku: String,
}

/// Address block used for both the billing and shipping sides of a record.
///
/// The two sides are structurally parallel on purpose: identical field names
/// let downstream consumers deduplicate matching billing/shipping values
/// generically. `email` and `phone` are typically absent on the shipping
/// side and are omitted from the serialized form when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressBlock {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub company: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    /// Country display name resolved through the host platform.
    pub country: String,
}

impl AddressBlock {
    /// Attribute list in presentation order, empty values normalized to `None`.
    fn attributes(&self) -> [(&'static str, Option<&str>); 10] {
        [
            ("Name", non_empty(&self.display_name)),
            ("Email", self.email.as_deref().and_then(non_empty)),
            ("Phone", self.phone.as_deref().and_then(non_empty)),
            ("Company", non_empty(&self.company)),
            ("Address 1", non_empty(&self.address_1)),
            ("Address 2", non_empty(&self.address_2)),
            ("City", non_empty(&self.city)),
            ("State", non_empty(&self.state)),
            ("Postcode", non_empty(&self.postcode)),
            ("Country", non_empty(&self.country)),
        ]
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
