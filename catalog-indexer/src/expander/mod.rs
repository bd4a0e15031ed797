//! Cross-entity impact expansion.
//!
//! The index stores denormalized movie documents embedding genre and person
//! data, so a changed genre or person must re-sync every movie referencing
//! it. This module translates non-movie id deltas into movie id deltas.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use uuid::Uuid;

use catalog_indexer_repository::{CatalogReader, RelationEdge};

use crate::errors::SyncError;

/// Expands genre/person deltas into the set of impacted movie ids.
pub struct ImpactExpander {
    reader: Arc<dyn CatalogReader>,
}

impl ImpactExpander {
    pub fn new(reader: Arc<dyn CatalogReader>) -> Self {
        Self { reader }
    }

    /// Movie ids referencing any of `changed_ids` through `edge`, gated by
    /// `movie.modified > checkpoint` so the result stays checkpoint-bounded.
    ///
    /// An empty input set returns an empty result without a query round
    /// trip: an id filter with zero elements must never reach the database.
    #[instrument(skip(self, changed_ids), fields(edge = ?edge, changed_count = changed_ids.len()))]
    pub async fn expand(
        &self,
        edge: RelationEdge,
        checkpoint: DateTime<Utc>,
        changed_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, SyncError> {
        if changed_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .reader
            .impacted_movies(edge, checkpoint, changed_ids)
            .await?;

        debug!(movie_count = rows.len(), "Expanded impact to movies");
        Ok(rows.into_iter().map(|row| row.id).collect())
    }
}
