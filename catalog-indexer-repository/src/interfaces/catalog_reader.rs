//! Catalog reader trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use catalog_indexer_shared::EntityKind;

use crate::errors::CatalogError;
use crate::types::{ChangedRow, JoinedRow, RelationEdge};

/// Read-only access to the relational catalog.
///
/// The pipeline issues exactly three query shapes, all exposed here so the
/// flow components can be tested against mock implementations:
///
/// 1. ids modified since a checkpoint, for one entity kind;
/// 2. movie ids impacted by a set of changed related-entity ids;
/// 3. fully joined denormalized rows for a set of movie ids.
///
/// Implementations must return an empty result without touching the
/// database when handed an empty id set — an id filter with zero elements
/// is a contract violation, not a query to run.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Ids of `kind` rows with `modified` past `since`, in non-decreasing
    /// modification order, at most `limit` of them.
    async fn modified_since(
        &self,
        kind: EntityKind,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChangedRow>, CatalogError>;

    /// Movie ids referencing any of `related_ids` through `edge`, gated by
    /// the movie's own `modified > since`, in non-decreasing modification
    /// order.
    async fn impacted_movies(
        &self,
        edge: RelationEdge,
        since: DateTime<Utc>,
        related_ids: &[Uuid],
    ) -> Result<Vec<ChangedRow>, CatalogError>;

    /// All joined rows for `movie_ids`, one row per
    /// (movie × person-role × genre) combination, in one round trip.
    async fn movie_rows(&self, movie_ids: &[Uuid]) -> Result<Vec<JoinedRow>, CatalogError>;
}
