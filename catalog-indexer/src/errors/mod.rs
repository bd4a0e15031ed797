//! Error types for the sync flows.

use thiserror::Error;

use catalog_indexer_repository::{CatalogError, CheckpointError, SearchIndexError};

/// Errors that can occur inside one refresh flow.
///
/// Every variant is treated as transient: the orchestrator re-runs the whole
/// flow from detection with exponential backoff, which is safe because the
/// checkpoint only advances after a successful bulk index.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Relational catalog read failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkpoint state load/save failed.
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Search engine request failed as a whole.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// A document could not be serialized for indexing.
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
