//! Row and request/response types for repository operations.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use catalog_indexer_shared::EntityKind;

/// The two supported movie-relation join shapes.
///
/// Impact expansion only ever joins through one of these closed edges; the
/// relation table and related-id column are fixed per variant, never built
/// from runtime input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationEdge {
    /// `content.movie_genre_rel`, keyed by `genre_id`.
    Genre,
    /// `content.movie_person_rel`, keyed by `person_id`.
    Person,
}

impl RelationEdge {
    /// The edge through which changes to `kind` impact movies, if any.
    /// Movie changes impact movies directly and need no expansion.
    pub fn for_kind(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Movie => None,
            EntityKind::Genre => Some(RelationEdge::Genre),
            EntityKind::Person => Some(RelationEdge::Person),
        }
    }
}

/// One row of a change-detection or impact-expansion query.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChangedRow {
    pub id: Uuid,
    pub modified: DateTime<Utc>,
}

/// One row of the denormalizing joined fetch.
///
/// Movie columns are always present; the person-role pairing and the genre
/// come from left joins and may each be absent. Multiple rows describe the
/// same movie, one per (person-role × genre) combination.
#[derive(Debug, Clone, FromRow)]
pub struct JoinedRow {
    pub movie_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub movie_type: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub role: Option<String>,
    pub person_id: Option<Uuid>,
    pub person_name: Option<String>,
    pub person_created: Option<DateTime<Utc>>,
    pub person_modified: Option<DateTime<Utc>>,
    pub genre_id: Option<Uuid>,
    pub genre_name: Option<String>,
    pub genre_description: Option<String>,
    pub genre_created: Option<DateTime<Utc>>,
    pub genre_modified: Option<DateTime<Utc>>,
}

/// A document ready for bulk submission: target id plus serialized source.
#[derive(Debug, Clone)]
pub struct BulkDocument {
    pub id: Uuid,
    pub source: Value,
}

/// A single document rejected inside an otherwise accepted bulk response.
#[derive(Debug, Clone)]
pub struct BulkItemFailure {
    /// Document id as reported by the search engine.
    pub id: String,
    /// The engine's error object, serialized for logging.
    pub reason: String,
}

/// Outcome of one bulk submission.
///
/// A summary is returned whenever the request itself round-tripped; item
/// failures are data here, not errors, so one malformed document never
/// aborts the remaining items.
#[derive(Debug, Clone, Default)]
pub struct BulkSummary {
    pub total: usize,
    pub indexed: usize,
    pub failures: Vec<BulkItemFailure>,
}

impl BulkSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Merge another summary into this one (chunked submissions).
    pub fn absorb(&mut self, other: BulkSummary) {
        self.total += other.total;
        self.indexed += other.indexed;
        self.failures.extend(other.failures);
    }
}
