//! Person document type for the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::entity_kind::PersonRole;

/// Person document, built only when the person refresh flow is active.
///
/// Holds the person's attributes, the distinct set of roles they hold across
/// the movies in the current batch, and the ids of those movies. Both lists
/// are deduplicated on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDocument {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "crate::timestamp::serde_format")]
    pub created: DateTime<Utc>,
    #[serde(with = "crate::timestamp::serde_format")]
    pub modified: DateTime<Utc>,
    pub roles: Vec<PersonRole>,
    pub movie_ids: Vec<Uuid>,
}

impl PersonDocument {
    pub fn new(
        id: Uuid,
        name: String,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created,
            modified,
            roles: Vec::new(),
            movie_ids: Vec::new(),
        }
    }

    /// Record a role held by this person unless already present.
    pub fn add_role(&mut self, role: PersonRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
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
    fn test_roles_are_distinct() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut person = PersonDocument::new(Uuid::new_v4(), "A. Person".to_string(), ts, ts);

        person.add_role(PersonRole::Actor);
        person.add_role(PersonRole::Director);
        person.add_role(PersonRole::Actor);

        assert_eq!(person.roles, vec![PersonRole::Actor, PersonRole::Director]);
    }

    #[test]
    fn test_movie_ids_deduplicate() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut person = PersonDocument::new(Uuid::new_v4(), "A. Person".to_string(), ts, ts);
        let movie_id = Uuid::new_v4();

        person.add_movie(movie_id);
        person.add_movie(movie_id);

        assert_eq!(person.movie_ids, vec![movie_id]);
    }
}
