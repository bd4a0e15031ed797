//! Search index provider trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BulkDocument, BulkSummary};

/// Abstracts the underlying search engine.
///
/// Implementations are injected into the bulk indexer to enable dependency
/// injection and testing with mocks. All writes go through the bulk upsert
/// path; per-document failures inside an accepted bulk response are reported
/// in the returned [`BulkSummary`] rather than as errors, so callers decide
/// how to treat partial failure.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure `index` exists, creating it with `settings` if necessary.
    /// Called once per index during startup, before any documents flow.
    async fn ensure_index_exists(
        &self,
        index: &str,
        settings: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Submit one page of documents to the bulk upsert endpoint.
    ///
    /// Returns an error only when the request fails as a whole; a 2xx
    /// response with embedded per-item errors yields an `Ok` summary
    /// carrying those failures.
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkSummary, SearchIndexError>;
}
