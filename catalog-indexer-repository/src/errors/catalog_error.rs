use thiserror::Error;

/// Errors from relational catalog reads.
///
/// The catalog is a read-only collaborator; every variant here is an
/// infrastructure failure that the pipeline treats as transient and retries
/// at the flow level.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
