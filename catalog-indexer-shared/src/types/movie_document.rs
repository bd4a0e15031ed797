//! Movie document type for the search index.
//!
//! This module defines the denormalized movie document as it is stored in the
//! search engine, with related persons and genres embedded inline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::entity_kind::PersonRole;

/// Compact reference to a related person embedded in a movie document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
}

/// Compact reference to a related genre embedded in a movie document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: Uuid,
    pub name: String,
}

/// Denormalized movie document.
///
/// Relation lists hold each related entity at most once, in first-seen order;
/// membership is checked by id before insertion, so the document built from a
/// joined row set is deterministic for a fixed row order.
///
/// # Fields
///
/// - `id`: movie identifier, also the search document id
/// - `title`: primary search field
/// - `description`: secondary search field
/// - `imdb_rating`: numeric rating
/// - `movie_type`: catalog movie type, serialized as `type`
/// - `created` / `modified`: catalog timestamps
/// - `actors` / `writers` / `directors`: embedded person references per role
/// - `genres`: embedded genre references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub movie_type: Option<String>,
    #[serde(with = "crate::timestamp::serde_format")]
    pub created: DateTime<Utc>,
    #[serde(with = "crate::timestamp::serde_format")]
    pub modified: DateTime<Utc>,
    pub actors: Vec<PersonRef>,
    pub writers: Vec<PersonRef>,
    pub directors: Vec<PersonRef>,
    pub genres: Vec<GenreRef>,
}

impl MovieDocument {
    /// Create a movie document with empty relation lists.
    pub fn new(
        id: Uuid,
        title: String,
        description: Option<String>,
        imdb_rating: Option<f64>,
        movie_type: Option<String>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            imdb_rating,
            movie_type,
            created,
            modified,
            actors: Vec::new(),
            writers: Vec::new(),
            directors: Vec::new(),
            genres: Vec::new(),
        }
    }

    /// Append a person to the list for `role` unless that id is already present.
    pub fn add_person(&mut self, role: PersonRole, person: PersonRef) {
        let list = match role {
            PersonRole::Actor => &mut self.actors,
            PersonRole::Writer => &mut self.writers,
            PersonRole::Director => &mut self.directors,
        };
        if !list.iter().any(|p| p.id == person.id) {
            list.push(person);
        }
    }

    /// Append a genre unless that id is already present.
    pub fn add_genre(&mut self, genre: GenreRef) {
        if !self.genres.iter().any(|g| g.id == genre.id) {
            self.genres.push(genre);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_movie() -> MovieDocument {
        MovieDocument::new(
            Uuid::new_v4(),
            "Test Movie".to_string(),
            Some("A description".to_string()),
            Some(7.5),
            Some("movie".to_string()),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_add_person_deduplicates_by_id() {
        let mut movie = sample_movie();
        let person_id = Uuid::new_v4();

        for _ in 0..3 {
            movie.add_person(
                PersonRole::Actor,
                PersonRef {
                    id: person_id,
                    name: "Same Actor".to_string(),
                },
            );
        }

        assert_eq!(movie.actors.len(), 1);
        assert_eq!(movie.actors[0].id, person_id);
    }

    #[test]
    fn test_roles_accumulate_in_separate_lists() {
        let mut movie = sample_movie();
        let person_id = Uuid::new_v4();

        movie.add_person(
            PersonRole::Actor,
            PersonRef {
                id: person_id,
                name: "Multi Role".to_string(),
            },
        );
        movie.add_person(
            PersonRole::Director,
            PersonRef {
                id: person_id,
                name: "Multi Role".to_string(),
            },
        );

        assert_eq!(movie.actors.len(), 1);
        assert_eq!(movie.directors.len(), 1);
        assert!(movie.writers.is_empty());
    }

    #[test]
    fn test_add_genre_preserves_first_seen_order() {
        let mut movie = sample_movie();
        let drama = Uuid::new_v4();
        let comedy = Uuid::new_v4();

        movie.add_genre(GenreRef {
            id: drama,
            name: "Drama".to_string(),
        });
        movie.add_genre(GenreRef {
            id: comedy,
            name: "Comedy".to_string(),
        });
        movie.add_genre(GenreRef {
            id: drama,
            name: "Drama".to_string(),
        });

        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.genres[0].id, drama);
        assert_eq!(movie.genres[1].id, comedy);
    }

    #[test]
    fn test_serializes_type_and_date_format() {
        let movie = sample_movie();
        let value = serde_json::to_value(&movie).unwrap();

        assert_eq!(value["type"], "movie");
        assert_eq!(value["created"], "2024-01-01 00:00:00.000000");
        assert!(value.get("movie_type").is_none());
    }
}
