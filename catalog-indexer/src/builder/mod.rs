//! Document construction from joined catalog rows.
//!
//! Folds the flat (movie × person-role × genre) row set into aggregate
//! documents in a single pass. Movie documents are always built; genre and
//! person documents only when that refresh flow is active, since only then
//! do their checkpoints advance.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use catalog_indexer_repository::JoinedRow;
use catalog_indexer_shared::{
    EntityKind, GenreDocument, GenreRef, MovieDocument, PersonDocument, PersonRef, PersonRole,
};

/// The aggregates produced from one joined row set.
///
/// `genres` and `persons` are empty unless their direction was active.
/// All lists are in first-seen row order, so output is deterministic for a
/// fixed input row order.
#[derive(Debug, Default)]
pub struct BuiltDocuments {
    pub movies: Vec<MovieDocument>,
    pub genres: Vec<GenreDocument>,
    pub persons: Vec<PersonDocument>,
}

/// Folds joined rows into search documents.
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build documents for one batch of joined rows.
    ///
    /// `direction` is the entity kind whose refresh flow is running; it
    /// decides which aggregates besides movie documents are materialized.
    pub fn build(&self, rows: &[JoinedRow], direction: EntityKind) -> BuiltDocuments {
        let mut movies = Accumulator::<MovieDocument>::new();
        let mut genres = Accumulator::<GenreDocument>::new();
        let mut persons = Accumulator::<PersonDocument>::new();

        for row in rows {
            let movie = movies.get_or_insert(row.movie_id, || {
                MovieDocument::new(
                    row.movie_id,
                    row.title.clone(),
                    row.description.clone(),
                    row.rating,
                    row.movie_type.clone(),
                    row.created,
                    row.modified,
                )
            });

            if let (Some(person_id), Some(person_name)) = (row.person_id, row.person_name.as_ref())
            {
                match row.role.as_deref().and_then(PersonRole::parse) {
                    Some(role) => {
                        movie.add_person(
                            role,
                            PersonRef {
                                id: person_id,
                                name: person_name.clone(),
                            },
                        );

                        if direction == EntityKind::Person {
                            if let (Some(created), Some(modified)) =
                                (row.person_created, row.person_modified)
                            {
                                let person = persons.get_or_insert(person_id, || {
                                    PersonDocument::new(
                                        person_id,
                                        person_name.clone(),
                                        created,
                                        modified,
                                    )
                                });
                                person.add_role(role);
                                person.add_movie(row.movie_id);
                            }
                        }
                    }
                    None => {
                        warn!(
                            movie_id = %row.movie_id,
                            person_id = %person_id,
                            role = row.role.as_deref().unwrap_or("<null>"),
                            "Unknown person role, skipping relation"
                        );
                    }
                }
            }

            if let (Some(genre_id), Some(genre_name)) = (row.genre_id, row.genre_name.as_ref()) {
                movie.add_genre(GenreRef {
                    id: genre_id,
                    name: genre_name.clone(),
                });

                if direction == EntityKind::Genre {
                    if let (Some(created), Some(modified)) =
                        (row.genre_created, row.genre_modified)
                    {
                        let genre = genres.get_or_insert(genre_id, || {
                            GenreDocument::new(
                                genre_id,
                                genre_name.clone(),
                                row.genre_description.clone(),
                                created,
                                modified,
                            )
                        });
                        genre.add_movie(row.movie_id);
                    }
                }
            }
        }

        let built = BuiltDocuments {
            movies: movies.into_ordered(),
            genres: genres.into_ordered(),
            persons: persons.into_ordered(),
        };
        debug!(
            direction = %direction,
            movie_count = built.movies.len(),
            genre_count = built.genres.len(),
            person_count = built.persons.len(),
            "Built documents"
        );
        built
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Id-keyed map that remembers first-seen insertion order.
struct Accumulator<T> {
    by_id: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Accumulator<T> {
    fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn get_or_insert(&mut self, id: Uuid, create: impl FnOnce() -> T) -> &mut T {
        let order = &mut self.order;
        self.by_id.entry(id).or_insert_with(|| {
            order.push(id);
            create()
        })
    }

    fn into_ordered(self) -> Vec<T> {
        let Accumulator { mut by_id, order } = self;
        order.iter().filter_map(|id| by_id.remove(id)).collect()
    }
}
