//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! backed by an OpenSearch cluster, along with the index configuration and
//! field mappings for order records.

pub mod index_config;
pub mod provider;

pub use index_config::IndexConfig;
pub use provider::OpenSearchProvider;
