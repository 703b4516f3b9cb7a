//! Settings and dependency initialization for the orders index plugin.
//!
//! The host supplies its own contract implementations; everything about the
//! search backend (endpoint, index alias/version, connection behavior) is
//! read from environment variables as opaque strings.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::host::{OrderMetadataStore, OrderStore, PlatformLookups};
use crate::index::OrdersIndex;
use crate::ledger::RecordCountLedger;
use crate::projector::OrderProjector;
use crate::watcher::OrdersWatcher;
use crate::IndexingError;
use orders_index_repository::{IndexConfig, OpenSearchProvider, SearchIndexService};

/// Default search backend URL.
const DEFAULT_SEARCH_BACKEND_URL: &str = "http://localhost:9200";

/// Default orders index alias.
const DEFAULT_INDEX_ALIAS: &str = "orders";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if the backend is unreachable.
    FailFast,
    /// Retry until the backend becomes reachable.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode value.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive). Anything
    /// else falls back to retry.
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            other => {
                warn!(value = %other, "Invalid connection mode, defaulting to 'retry'");
                Self::Retry
            }
        }
    }

    /// Read the connection mode from `SEARCH_CONNECTION_MODE`.
    fn from_env() -> Self {
        Self::parse(&env::var("SEARCH_CONNECTION_MODE").unwrap_or_else(|_| "retry".to_string()))
    }
}

/// Container for the initialized plugin components.
pub struct Dependencies {
    /// The orders index, ready to sync.
    pub index: Arc<OrdersIndex>,
    /// The watcher wired to the index; hand it the host's event stream.
    pub watcher: OrdersWatcher,
    /// The validated search service, for the admin order-search backend.
    pub search: Arc<SearchIndexService>,
}

impl Dependencies {
    /// Initialize all plugin components.
    ///
    /// The host passes its contract implementations; backend settings come
    /// from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_BACKEND_URL`: Search backend URL (default: http://localhost:9200)
    /// - `ORDERS_INDEX_ALIAS`: Index alias name (default: "orders")
    /// - `ORDERS_INDEX_VERSION`: Physical index version number (default: 0)
    /// - `SEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `SEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized components
    /// * `Err(IndexingError)` - If initialization fails (only in fail-fast mode)
    pub async fn new(
        store: Arc<dyn OrderStore>,
        metadata: Arc<dyn OrderMetadataStore>,
        lookups: Arc<dyn PlatformLookups>,
    ) -> Result<Self, IndexingError> {
        let backend_url = env::var("SEARCH_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_SEARCH_BACKEND_URL.to_string());
        let index_alias =
            env::var("ORDERS_INDEX_ALIAS").unwrap_or_else(|_| DEFAULT_INDEX_ALIAS.to_string());
        let index_version = env::var("ORDERS_INDEX_VERSION")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env::var("SEARCH_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        info!(
            backend_url = %backend_url,
            index_alias = %index_alias,
            index_version = index_version,
            connection_mode = ?connection_mode,
            retry_interval_secs = retry_interval,
            "Initializing orders index dependencies"
        );

        let index_config = IndexConfig::new(index_alias.clone(), index_version);
        let provider = OpenSearchProvider::new(&backend_url, index_config)
            .await
            .map_err(|e| {
                IndexingError::config(format!("Failed to create search provider: {}", e))
            })?;
        let search = Arc::new(SearchIndexService::new(Arc::new(provider)));

        // Make sure the index and alias exist before any sync runs.
        Self::initialize_index(
            &search,
            connection_mode,
            Duration::from_secs(retry_interval),
        )
        .await?;

        info!("Search backend ready");

        let projector = OrderProjector::new(lookups);
        let ledger = RecordCountLedger::new(metadata, &index_alias);
        let index = Arc::new(OrdersIndex::new(
            index_alias,
            projector,
            ledger,
            search.clone(),
        ));
        let watcher = OrdersWatcher::new(index.clone(), store);

        Ok(Self {
            index,
            watcher,
            search,
        })
    }

    /// Ensure the index exists, honoring the configured connection mode.
    async fn initialize_index(
        search: &SearchIndexService,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<(), IndexingError> {
        loop {
            match search.ensure_index_exists().await {
                Ok(()) => return Ok(()),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to initialize search index: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Search backend not ready, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

/// Initialize tracing with an env-filterable console subscriber.
///
/// Intended for hosts that have no subscriber of their own; calling it
/// twice returns an error rather than panicking.
pub fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("orders_index=info,orders_index_repository=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_mode_parse() {
        assert_eq!(ConnectionMode::parse("fail-fast"), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse("FAILFAST"), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse("fail_fast"), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse("retry"), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse("nonsense"), ConnectionMode::Retry);
    }
}
