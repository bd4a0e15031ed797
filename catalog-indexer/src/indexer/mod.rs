//! Batched bulk indexing into the search engine.
//!
//! Chunks documents into pages and submits each page through the provider's
//! bulk endpoint. A document rejected inside an accepted response is logged
//! and skipped; it never fails the page, the remaining pages, or the flow.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use catalog_indexer_repository::{BulkDocument, BulkSummary, SearchIndexProvider};
use catalog_indexer_shared::{GenreDocument, MovieDocument, PersonDocument};

use crate::errors::SyncError;

/// A document type that can be written to the search index.
pub trait SearchDocument: Serialize {
    /// The id the document is indexed under.
    fn document_id(&self) -> Uuid;
}

impl SearchDocument for MovieDocument {
    fn document_id(&self) -> Uuid {
        self.id
    }
}

impl SearchDocument for GenreDocument {
    fn document_id(&self) -> Uuid {
        self.id
    }
}

impl SearchDocument for PersonDocument {
    fn document_id(&self) -> Uuid {
        self.id
    }
}

/// Submits documents to the search engine in bounded bulk pages.
pub struct BulkIndexer {
    provider: Arc<dyn SearchIndexProvider>,
    batch_size: usize,
}

impl BulkIndexer {
    pub fn new(provider: Arc<dyn SearchIndexProvider>, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size,
        }
    }

    /// Index `documents` into `index`, one bulk request per page.
    ///
    /// Returns an error only when a whole request fails (transport, non-2xx);
    /// per-item rejections are logged and carried in the returned summary.
    #[instrument(skip(self, documents), fields(index = %index, document_count = documents.len()))]
    pub async fn index_documents<T: SearchDocument>(
        &self,
        index: &str,
        documents: &[T],
    ) -> Result<BulkSummary, SyncError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut summary = BulkSummary::default();
        for chunk in documents.chunks(self.batch_size) {
            let page = chunk
                .iter()
                .map(|doc| {
                    Ok(BulkDocument {
                        id: doc.document_id(),
                        source: serde_json::to_value(doc)?,
                    })
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?;

            let page_summary = self.provider.bulk_index(index, &page).await?;

            for failure in &page_summary.failures {
                error!(
                    index = %index,
                    document_id = %failure.id,
                    error = %failure.reason,
                    "Document rejected by search engine"
                );
            }

            summary.absorb(page_summary);
        }

        debug!(
            index = %index,
            indexed = summary.indexed,
            failed = summary.failed(),
            "Bulk indexing finished"
        );
        Ok(summary)
    }
}
