//! Genre document type for the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Genre document, built only when the genre refresh flow is active.
///
/// Holds the genre's own attributes plus the ids of the movies referencing
/// it in the current batch. `movie_ids` never contains duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::timestamp::serde_format")]
    pub created: DateTime<Utc>,
    #[serde(with = "crate::timestamp::serde_format")]
    pub modified: DateTime<Utc>,
    pub movie_ids: Vec<Uuid>,
}

impl GenreDocument {
    pub fn new(
        id: Uuid,
        name: String,
        description: Option<String>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created,
            modified,
            movie_ids: Vec::new(),
        }
    }

    /// Record a referencing movie unless it is already present.
    pub fn add_movie(&mut self, movie_id: Uuid) {
        if !self.movie_ids.contains(&movie_id) {
            self.movie_ids.push(movie_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_add_movie_deduplicates() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut genre = GenreDocument::new(Uuid::new_v4(), "Drama".to_string(), None, ts, ts);
        let movie_id = Uuid::new_v4();

        genre.add_movie(movie_id);
        genre.add_movie(movie_id);

        assert_eq!(genre.movie_ids, vec![movie_id]);
    }
}
