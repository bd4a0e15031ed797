//! PostgreSQL implementation of the catalog reader.
//!
//! All queries are statically known templates with bound parameters only.
//! Table and column names are selected through the `EntityKind` and
//! `RelationEdge` enums; id sets are bound as array values (`= ANY($n)`),
//! never formatted into the SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use catalog_indexer_shared::EntityKind;

use crate::errors::CatalogError;
use crate::interfaces::CatalogReader;
use crate::types::{ChangedRow, JoinedRow, RelationEdge};

const MOVIES_MODIFIED_SINCE: &str = "\
    SELECT id, modified FROM content.movie \
    WHERE modified > $1 ORDER BY modified LIMIT $2";

const GENRES_MODIFIED_SINCE: &str = "\
    SELECT id, modified FROM content.genre \
    WHERE modified > $1 ORDER BY modified LIMIT $2";

const PERSONS_MODIFIED_SINCE: &str = "\
    SELECT id, modified FROM content.person \
    WHERE modified > $1 ORDER BY modified LIMIT $2";

const MOVIES_BY_GENRE: &str = "\
    SELECT DISTINCT m.id, m.modified \
    FROM content.movie m \
    LEFT JOIN content.movie_genre_rel r ON r.movie_id = m.id \
    WHERE m.modified > $1 AND r.genre_id = ANY($2) \
    ORDER BY m.modified";

const MOVIES_BY_PERSON: &str = "\
    SELECT DISTINCT m.id, m.modified \
    FROM content.movie m \
    LEFT JOIN content.movie_person_rel r ON r.movie_id = m.id \
    WHERE m.modified > $1 AND r.person_id = ANY($2) \
    ORDER BY m.modified";

const MOVIE_JOINED_ROWS: &str = "\
    SELECT \
        m.id AS movie_id, \
        m.title, \
        m.description, \
        m.rating, \
        m.type AS movie_type, \
        m.created, \
        m.modified, \
        pr.role::text AS role, \
        p.id AS person_id, \
        p.name AS person_name, \
        p.created AS person_created, \
        p.modified AS person_modified, \
        g.id AS genre_id, \
        g.name AS genre_name, \
        g.description AS genre_description, \
        g.created AS genre_created, \
        g.modified AS genre_modified \
    FROM content.movie m \
    LEFT JOIN content.movie_person_rel pr ON pr.movie_id = m.id \
    LEFT JOIN content.person p ON p.id = pr.person_id \
    LEFT JOIN content.movie_genre_rel gr ON gr.movie_id = m.id \
    LEFT JOIN content.genre g ON g.id = gr.genre_id \
    WHERE m.id = ANY($1)";

/// Catalog reader backed by a shared PostgreSQL connection pool.
pub struct PostgresCatalogReader {
    pool: sqlx::PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn modified_since(
        &self,
        kind: EntityKind,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChangedRow>, CatalogError> {
        let query = match kind {
            EntityKind::Movie => MOVIES_MODIFIED_SINCE,
            EntityKind::Genre => GENRES_MODIFIED_SINCE,
            EntityKind::Person => PERSONS_MODIFIED_SINCE,
        };

        let rows = sqlx::query_as::<_, ChangedRow>(query)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(kind = %kind, row_count = rows.len(), "Fetched modified ids");
        Ok(rows)
    }

    async fn impacted_movies(
        &self,
        edge: RelationEdge,
        since: DateTime<Utc>,
        related_ids: &[Uuid],
    ) -> Result<Vec<ChangedRow>, CatalogError> {
        if related_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = match edge {
            RelationEdge::Genre => MOVIES_BY_GENRE,
            RelationEdge::Person => MOVIES_BY_PERSON,
        };

        let rows = sqlx::query_as::<_, ChangedRow>(query)
            .bind(since)
            .bind(related_ids)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            edge = ?edge,
            related_count = related_ids.len(),
            movie_count = rows.len(),
            "Expanded impacted movies"
        );
        Ok(rows)
    }

    async fn movie_rows(&self, movie_ids: &[Uuid]) -> Result<Vec<JoinedRow>, CatalogError> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, JoinedRow>(MOVIE_JOINED_ROWS)
            .bind(movie_ids)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            movie_count = movie_ids.len(),
            row_count = rows.len(),
            "Fetched joined movie rows"
        );
        Ok(rows)
    }
}
