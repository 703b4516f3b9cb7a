//! # Orders Index Shared
//!
//! This crate defines shared data structures and types used across the orders
//! search indexer ecosystem. It includes the flat record shape pushed to the
//! remote search service and the query/response types used by the admin
//! order-search backend.

pub mod types;

pub use types::order_record::{AddressBlock, CustomerRecord, LineItemRecord, OrderRecord};
pub use types::search_query::SearchQuery;
pub use types::search_result::{OrderHit, OrderSearchResponse};
