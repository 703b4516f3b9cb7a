//! Record projector implementation.
//!
//! Transforms one order into the flat records written to the search index.

use std::sync::Arc;

use crate::host::PlatformLookups;
use crate::order::{Order, OrderAddress, OrderKind};
use orders_index_shared::{AddressBlock, CustomerRecord, LineItemRecord, OrderRecord};

/// Projects orders into search records.
///
/// Projection is a pure function of the order and the host's display
/// lookups at call time. An order projects to at most one record today
/// (`record_index` 0), but the positional addressing lets a future entity
/// type split into several records per order without touching the
/// synchronization protocol.
pub struct OrderProjector {
    lookups: Arc<dyn PlatformLookups>,
}

impl OrderProjector {
    /// Create a new projector using the host's display lookups.
    pub fn new(lookups: Arc<dyn PlatformLookups>) -> Self {
        Self { lookups }
    }

    /// Project an order into its records.
    ///
    /// Returns an empty vec when the order should have no presence in the
    /// index: the commerce module is unavailable, or the entity is not a
    /// standard order.
    pub fn project(&self, order: &Order) -> Vec<OrderRecord> {
        if !self.lookups.commerce_enabled() {
            return Vec::new();
        }
        if order.kind != OrderKind::Standard {
            return Vec::new();
        }

        let (date_timestamp, date_formatted) = match &order.date_created {
            Some(date) => (date.timestamp(), self.lookups.format_date(date)),
            None => (0, String::new()),
        };

        let record = OrderRecord {
            object_id: OrderRecord::record_address(order.id, 0),
            id: order.id,
            kind: order.kind.as_str().to_string(),
            number: order.number.clone(),
            status: order.status.clone(),
            status_name: self.lookups.order_status_name(&order.status),
            date_timestamp,
            date_formatted,
            order_total: order.total,
            formatted_order_total: self.lookups.format_amount(order.total),
            items_count: order.items_count(),
            payment_method_title: order.payment_method_title.clone(),
            shipping_method_title: order.shipping_method_title.clone(),
            customer: order.customer.as_ref().map(|customer| CustomerRecord {
                id: customer.id,
                display_name: customer.display_name(),
                email: customer.email.clone(),
            }),
            billing: self.project_address(&order.billing),
            shipping: self.project_address(&order.shipping),
            items: order
                .items
                .iter()
                .map(|item| LineItemRecord {
                    id: item.id,
                    name: item.name.clone(),
                    qty: item.quantity,
                    sku: item.sku.clone(),
                })
                .collect(),
        };

        vec![record]
    }

    fn project_address(&self, address: &OrderAddress) -> AddressBlock {
        AddressBlock {
            display_name: address.full_name(),
            email: address.email.clone(),
            phone: address.phone.clone(),
            company: address.company.clone(),
            address_1: address.address_1.clone(),
            address_2: address.address_2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            postcode: address.postcode.clone(),
            country: self.lookups.country_name(&address.country_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Customer, OrderLineItem};
    use chrono::{DateTime, TimeZone, Utc};

    struct FakeLookups {
        commerce_enabled: bool,
    }

    impl FakeLookups {
        fn new() -> Self {
            Self {
                commerce_enabled: true,
            }
        }
    }

    impl PlatformLookups for FakeLookups {
        fn commerce_enabled(&self) -> bool {
            self.commerce_enabled
        }

        fn order_status_name(&self, status: &str) -> String {
            let mut chars = status.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }

        fn country_name(&self, code: &str) -> String {
            match code {
                "US" => "United States (US)".to_string(),
                "FR" => "France".to_string(),
                _ => code.to_string(),
            }
        }

        fn format_date(&self, date: &DateTime<Utc>) -> String {
            date.format("%B %-d, %Y").to_string()
        }

        fn format_amount(&self, amount: f64) -> String {
            format!("${:.2}", amount)
        }
    }

    fn sample_order() -> Order {
        Order {
            id: 42,
            kind: OrderKind::Standard,
            number: "42".to_string(),
            status: "processing".to_string(),
            date_created: Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()),
            total: 59.90,
            payment_method_title: "Credit card".to_string(),
            shipping_method_title: "Flat rate".to_string(),
            customer: Some(Customer {
                id: 7,
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
            }),
            billing: OrderAddress {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: Some("jane@example.com".to_string()),
                phone: Some("555-0100".to_string()),
                city: "Portland".to_string(),
                country_code: "US".to_string(),
                ..Default::default()
            },
            shipping: OrderAddress {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                city: "Paris".to_string(),
                country_code: "FR".to_string(),
                ..Default::default()
            },
            items: vec![
                OrderLineItem {
                    id: 1,
                    name: "Widget".to_string(),
                    quantity: 2,
                    sku: "WDG-1".to_string(),
                },
                OrderLineItem {
                    id: 2,
                    name: "Gadget".to_string(),
                    quantity: 1,
                    sku: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_project_standard_order() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let records = projector.project(&sample_order());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.object_id, "42-0");
        assert_eq!(record.id, 42);
        assert_eq!(record.kind, "shop_order");
        assert_eq!(record.status_name, "Processing");
        assert_eq!(record.items_count, 3);
        assert_eq!(record.formatted_order_total, "$59.90");
        assert_eq!(record.date_formatted, "November 14, 2023");
        assert!(record.date_timestamp > 0);
    }

    #[test]
    fn test_project_resolves_country_names_on_both_blocks() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let records = projector.project(&sample_order());

        let record = &records[0];
        assert_eq!(record.billing.country, "United States (US)");
        assert_eq!(record.shipping.country, "France");
        // Shipping has no email/phone on the host side either.
        assert!(record.shipping.email.is_none());
        assert!(record.shipping.phone.is_none());
    }

    #[test]
    fn test_project_line_items_in_order() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let records = projector.project(&sample_order());

        let items = &records[0].items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Widget");
        assert_eq!(items[0].qty, 2);
        assert_eq!(items[0].sku, "WDG-1");
        assert_eq!(items[1].sku, "");
    }

    #[test]
    fn test_project_customer() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let records = projector.project(&sample_order());

        let customer = records[0].customer.as_ref().unwrap();
        assert_eq!(customer.display_name, "Jane Doe");

        let mut guest_order = sample_order();
        guest_order.customer = None;
        assert!(projector.project(&guest_order)[0].customer.is_none());
    }

    #[test]
    fn test_project_order_without_date() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let mut order = sample_order();
        order.date_created = None;

        let records = projector.project(&order);
        assert_eq!(records[0].date_timestamp, 0);
        assert_eq!(records[0].date_formatted, "");
    }

    #[test]
    fn test_project_refund_yields_nothing() {
        let projector = OrderProjector::new(Arc::new(FakeLookups::new()));
        let mut order = sample_order();
        order.kind = OrderKind::Refund;

        assert!(projector.project(&order).is_empty());
    }

    #[test]
    fn test_project_without_commerce_yields_nothing() {
        let projector = OrderProjector::new(Arc::new(FakeLookups {
            commerce_enabled: false,
        }));

        assert!(projector.project(&sample_order()).is_empty());
    }
}
