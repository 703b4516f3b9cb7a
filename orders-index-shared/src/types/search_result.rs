//! Search result types for the admin order-search backend.

use serde::{Deserialize, Serialize};

use crate::types::order_record::OrderRecord;

/// A single order hit returned from a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderHit {
    /// The stored record, as it was last written by a sync.
    #[serde(flatten)]
    pub record: OrderRecord,

    /// Relevance score from the search backend. Higher is better.
    pub relevance_score: f64,

    /// Highlighted fragment of the order-number field, when requested and
    /// the backend produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_highlight: Option<String>,
}

/// Complete search response with hits and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSearchResponse {
    /// Hits for the requested page, ordered by relevance then recency.
    pub hits: Vec<OrderHit>,

    /// Total number of matching records across all pages.
    pub total: u64,

    /// Time the backend took to execute the search, in milliseconds.
    pub took_ms: u64,
}

impl OrderSearchResponse {
    /// Create an empty response.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            took_ms: 0,
        }
    }

    /// Create a new response.
    pub fn new(hits: Vec<OrderHit>, total: u64, took_ms: u64) -> Self {
        Self {
            hits,
            total,
            took_ms,
        }
    }

    /// Returns true if there are no hits on this page.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of hits on this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
