//! # Catalog Indexer Repository
//!
//! This crate provides traits and implementations for the catalog indexer's
//! external collaborators: the relational catalog (read-only, PostgreSQL),
//! the checkpoint store, and the search index (OpenSearch). It includes
//! definitions for errors, interfaces, and the concrete implementations.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use errors::{CatalogError, CheckpointError, SearchIndexError};
pub use interfaces::{CatalogReader, CheckpointRepository, SearchIndexProvider};
pub use opensearch::OpenSearchProvider;
pub use postgres::{PostgresCatalogReader, PostgresCheckpointRepository};
pub use types::{BulkDocument, BulkItemFailure, BulkSummary, ChangedRow, JoinedRow, RelationEdge};
