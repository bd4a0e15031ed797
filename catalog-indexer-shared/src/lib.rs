//! # Catalog Indexer Shared
//!
//! This crate defines shared data structures and types used across the catalog
//! indexer system: the search documents built per sync tick, the entity kinds
//! driving the three refresh flows, and the checkpoint state that bounds
//! change detection.

pub mod timestamp;
pub mod types;

pub use types::checkpoint::Checkpoint;
pub use types::entity_kind::{EntityKind, PersonRole};
pub use types::genre_document::GenreDocument;
pub use types::movie_document::{GenreRef, MovieDocument, PersonRef};
pub use types::person_document::PersonDocument;
