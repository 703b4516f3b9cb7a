//! Search query types for the admin order-search backend.

use serde::{Deserialize, Serialize};

/// Default number of hits per result page.
///
/// Matches the admin autocomplete widget, which renders seven suggestions.
pub const DEFAULT_HITS_PER_PAGE: usize = 7;

/// Upper bound on hits per page to keep result payloads small.
const MAX_HITS_PER_PAGE: usize = 100;

/// Free-text query against the orders index.
///
/// Results are matched across the searchable record attributes (order
/// number, customer and address fields, SKUs, status name) and ordered by
/// relevance with recency as the tie breaker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// The free-text query string.
    pub text: String,

    /// Zero-based result page.
    #[serde(default)]
    pub page: usize,

    /// Number of hits per page.
    #[serde(default = "default_hits_per_page")]
    pub hits_per_page: usize,

    /// Whether to return a highlighted fragment of the order-number field
    /// alongside each hit.
    #[serde(default = "default_true")]
    pub highlight_number: bool,
}

fn default_hits_per_page() -> usize {
    DEFAULT_HITS_PER_PAGE
}

fn default_true() -> bool {
    true
}

impl SearchQuery {
    /// Create a query with the default page size and highlighting enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use orders_index_shared::SearchQuery;
    ///
    /// let query = SearchQuery::new("1042");
    /// assert_eq!(query.hits_per_page, 7);
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: 0,
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            highlight_number: true,
        }
    }

    /// Set the result page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Set the page size, capped at 100.
    pub fn with_hits_per_page(mut self, hits_per_page: usize) -> Self {
        self.hits_per_page = hits_per_page.min(MAX_HITS_PER_PAGE);
        self
    }

    /// Disable order-number highlighting.
    pub fn without_highlight(mut self) -> Self {
        self.highlight_number = false;
        self
    }

    /// Offset of the first hit for this page.
    pub fn offset(&self) -> usize {
        self.page * self.hits_per_page
    }

    /// Validate the query parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Query text cannot be empty".to_string());
        }
        if self.hits_per_page == 0 {
            return Err("hits_per_page must be at least 1".to_string());
        }
        Ok(())
    }
}
