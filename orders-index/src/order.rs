//! Order domain types as consumed by the plugin.
//!
//! These mirror the host platform's order model. The plugin only reads
//! them; the single piece of order state it owns is the record-count
//! annotation persisted through [`crate::host::OrderMetadataStore`].

use chrono::{DateTime, Utc};

/// The kind of order-like entity the host may hand us.
///
/// Only standard orders are indexed; refunds and other order-like types are
/// outside the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderKind {
    #[default]
    Standard,
    Refund,
}

impl OrderKind {
    /// The host platform's slug for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Standard => "shop_order",
            OrderKind::Refund => "shop_order_refund",
        }
    }
}

/// An order as read from the host platform.
#[derive(Debug, Clone, Default)]
pub struct Order {
    /// Stable order identifier.
    pub id: u64,
    pub kind: OrderKind,
    /// Customer-facing order number; usually the id, but hosts may override.
    pub number: String,
    /// Raw status slug (e.g. "processing").
    pub status: String,
    pub date_created: Option<DateTime<Utc>>,
    pub total: f64,
    pub payment_method_title: String,
    pub shipping_method_title: String,
    /// The registered customer, when the order is not a guest order.
    pub customer: Option<Customer>,
    pub billing: OrderAddress,
    pub shipping: OrderAddress,
    /// Line items in order position.
    pub items: Vec<OrderLineItem>,
}

impl Order {
    /// Total quantity across all line items.
    pub fn items_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// A registered customer attached to an order.
#[derive(Debug, Clone, Default)]
pub struct Customer {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// "First Last" display form.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One side of an order's address data (billing or shipping).
#[derive(Debug, Clone, Default)]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    /// Typically present on billing only.
    pub email: Option<String>,
    /// Typically present on billing only.
    pub phone: Option<String>,
    pub company: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    /// ISO country code; resolved to a display name at projection time.
    pub country_code: String,
}

impl OrderAddress {
    /// "First Last" display form, empty when neither name is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One order line item.
#[derive(Debug, Clone, Default)]
pub struct OrderLineItem {
    pub id: u64,
    pub name: String,
    pub quantity: u32,
    /// Product SKU, empty when the product no longer resolves.
    pub sku: String,
}
