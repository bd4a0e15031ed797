//! Dependency initialization and wiring for the catalog indexer.
//!
//! Every component receives its collaborators explicitly; the shared
//! PostgreSQL pool and the OpenSearch client are created once here and the
//! orchestrator owns the wired pipeline. Any failure in this module is a
//! fatal startup error.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use catalog_indexer_repository::opensearch::index_config;
use catalog_indexer_repository::{
    CheckpointRepository, OpenSearchProvider, PostgresCatalogReader,
    PostgresCheckpointRepository, SearchIndexProvider,
};

use crate::builder::DocumentBuilder;
use crate::config::Settings;
use crate::detector::ChangeDetector;
use crate::expander::ImpactExpander;
use crate::indexer::BulkIndexer;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::IndexerError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Connects to PostgreSQL and OpenSearch, bootstraps the state table and
    /// the three indexes, loads the stored checkpoint, and wires the
    /// pipeline components.
    pub async fn new() -> Result<Self, IndexerError> {
        let settings = Settings::from_env()?;

        info!(
            opensearch_url = %settings.opensearch_url,
            sync_interval_secs = settings.sync_interval.as_secs(),
            change_page_size = settings.change_page_size,
            bulk_batch_size = settings.bulk_batch_size,
            "Initializing dependencies"
        );

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&settings.database_url)
            .await
            .map_err(|e| {
                IndexerError::config(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        info!("PostgreSQL connection established");

        let checkpoints = PostgresCheckpointRepository::new(pool.clone());
        checkpoints.ensure_schema().await.map_err(|e| {
            IndexerError::config(format!("Failed to bootstrap the state table: {}", e))
        })?;

        let provider = OpenSearchProvider::new(&settings.opensearch_url)
            .await
            .map_err(|e| {
                IndexerError::config(format!("Failed to create OpenSearch provider: {}", e))
            })?;

        // Create any missing index before documents flow.
        let indexes = [
            (&settings.movies_index, index_config::movies_index_settings()),
            (&settings.genres_index, index_config::genres_index_settings()),
            (
                &settings.persons_index,
                index_config::persons_index_settings(),
            ),
        ];
        for (index, index_settings) in &indexes {
            provider
                .ensure_index_exists(index, index_settings)
                .await
                .map_err(|e| {
                    IndexerError::config(format!("Failed to ensure index '{}' exists: {}", index, e))
                })?;
        }

        info!("OpenSearch connection established");

        let checkpoints = Arc::new(checkpoints);
        let state = checkpoints.load().await.map_err(|e| {
            IndexerError::config(format!("Failed to load checkpoint state: {}", e))
        })?;

        let reader = Arc::new(PostgresCatalogReader::new(pool));
        let detector = ChangeDetector::new(reader.clone(), settings.change_page_size);
        let expander = ImpactExpander::new(reader.clone());
        let builder = DocumentBuilder::new();
        let indexer = BulkIndexer::new(Arc::new(provider), settings.bulk_batch_size);

        let orchestrator = Orchestrator::new(
            detector,
            expander,
            builder,
            indexer,
            reader,
            checkpoints,
            state,
            OrchestratorConfig {
                sync_interval: settings.sync_interval,
                movies_index: settings.movies_index,
                genres_index: settings.genres_index,
                persons_index: settings.persons_index,
            },
        );

        Ok(Self { orchestrator })
    }
}
