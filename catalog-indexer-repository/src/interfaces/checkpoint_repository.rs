//! Checkpoint repository trait definition.

use async_trait::async_trait;

use catalog_indexer_shared::Checkpoint;

use crate::errors::CheckpointError;

/// Durable storage for the pipeline's checkpoint state.
///
/// The store is single-writer single-reader: the whole state map is read
/// once at startup and rewritten wholesale after each flow commit, so no
/// conflict resolution is needed.
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Read the stored state. An absent state reads as an empty checkpoint,
    /// making the first run a full resync.
    async fn load(&self) -> Result<Checkpoint, CheckpointError>;

    /// Persist the whole state map atomically.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;
}
