//! Entity kinds and person roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three synchronized aggregate types, each driving its own refresh flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Genre,
    Person,
}

impl EntityKind {
    /// All kinds in flow execution order (movie first).
    pub const ALL: [EntityKind; 3] = [EntityKind::Movie, EntityKind::Genre, EntityKind::Person];

    /// The kind name as it appears in catalog table names and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Genre => "genre",
            EntityKind::Person => "person",
        }
    }

    /// The key under which this kind's checkpoint is stored.
    pub fn state_key(&self) -> String {
        format!("{}_last_modified", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a person holds on a movie, as stored in the movie-person relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Actor,
    Writer,
    Director,
}

impl PersonRole {
    /// Parse a role column value. Returns `None` for anything outside the
    /// known role set so callers can skip and log unknown values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "actor" => Some(PersonRole::Actor),
            "writer" => Some(PersonRole::Writer),
            "director" => Some(PersonRole::Director),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Actor => "actor",
            PersonRole::Writer => "writer",
            PersonRole::Director => "director",
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
