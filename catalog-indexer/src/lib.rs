//! # Catalog Indexer
//!
//! Keeps the movie search index synchronized with the relational catalog by
//! polling for modifications and re-indexing the affected documents.
//!
//! ## Architecture
//!
//! Each tick runs three refresh flows (movie, genre, person) through the
//! same stage sequence:
//!
//! 1. **Detector**: finds ids modified past the kind's checkpoint
//! 2. **Expander**: translates genre/person deltas into impacted movie ids
//! 3. **Builder**: folds joined catalog rows into denormalized documents
//! 4. **Indexer**: submits documents to the search engine in bulk pages
//! 5. **Orchestrator**: wires the stages, retries failed flows with backoff,
//!    and commits the checkpoint after each successful flow
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`detector`]: Change detection against the checkpoint
//! - [`expander`]: Cross-entity impact expansion
//! - [`builder`]: Document construction from joined rows
//! - [`indexer`]: Batched bulk indexing
//! - [`orchestrator`]: Tick loop and per-flow retry
//! - [`errors`]: Error types for the sync flows

pub mod builder;
pub mod config;
pub mod detector;
pub mod errors;
pub mod expander;
pub mod indexer;
pub mod orchestrator;

pub use config::Dependencies;
pub use errors::SyncError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Configuration or startup error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sync flow error.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),
}

impl IndexerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
