//! Error types for the synchronizer.

use orders_index_repository::SearchIndexError;
use thiserror::Error;

/// Error raised by a host platform contract implementation.
///
/// The plugin treats the host as opaque; whatever failed on the host side
/// is carried as a message.
#[derive(Debug, Clone, Error)]
#[error("Host platform error: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors from a single sync or delete attempt against the search index.
///
/// A remote failure means the index may be stale but the ledger still
/// matches what was last written. A ledger failure is worse: the next sync
/// would compute the wrong stale-address range, so it aborts the attempt.
/// Neither may interrupt the host operation that triggered the sync; the
/// watcher catches both and logs them.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote search index rejected or failed an operation.
    #[error("Remote index error: {0}")]
    Remote(#[from] SearchIndexError),

    /// Reading or persisting the per-order record count failed.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl SyncError {
    /// Create a ledger error.
    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger(msg.into())
    }
}
