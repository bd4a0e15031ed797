use thiserror::Error;

/// Errors from checkpoint state persistence.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Failure talking to the backing store.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Stored state that cannot be decoded (or state that cannot be encoded).
    #[error("State serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
