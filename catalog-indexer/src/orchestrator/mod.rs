//! Orchestrator for the sync pipeline.
//!
//! Runs the three refresh flows (movie, genre, person) sequentially on a
//! fixed interval. Each flow is wrapped in retry-with-backoff: a failure at
//! any stage re-runs the whole flow from detection, which is safe because
//! the checkpoint only advances after a successful bulk index.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tracing::{debug, error, info, instrument, warn};

use catalog_indexer_repository::{
    BulkSummary, CatalogReader, CheckpointRepository, RelationEdge,
};
use catalog_indexer_shared::{timestamp, Checkpoint, EntityKind};

use crate::builder::DocumentBuilder;
use crate::detector::ChangeDetector;
use crate::errors::SyncError;
use crate::expander::ImpactExpander;
use crate::indexer::BulkIndexer;

/// Base for the exponential retry delays, in milliseconds.
const RETRY_BASE_DELAY_MS: u64 = 10;

/// Multiplier applied to each retry delay.
const RETRY_FACTOR: u64 = 50;

/// Cap on the retry delay; attempts themselves are unbounded.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Sleep between ticks.
    pub sync_interval: Duration,
    /// Target index per document type.
    pub movies_index: String,
    pub genres_index: String,
    pub persons_index: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(5),
            movies_index: "movies".to_string(),
            genres_index: "genres".to_string(),
            persons_index: "persons".to_string(),
        }
    }
}

/// Orchestrator that coordinates the sync components.
///
/// Owns the checkpoint state for the lifetime of the process; the state is
/// loaded once at startup (by dependency wiring) and handed in here, then
/// mutated and persisted after every successful flow.
pub struct Orchestrator {
    detector: ChangeDetector,
    expander: ImpactExpander,
    builder: DocumentBuilder,
    indexer: BulkIndexer,
    reader: Arc<dyn CatalogReader>,
    checkpoints: Arc<dyn CheckpointRepository>,
    state: Checkpoint,
    config: OrchestratorConfig,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        detector: ChangeDetector,
        expander: ImpactExpander,
        builder: DocumentBuilder,
        indexer: BulkIndexer,
        reader: Arc<dyn CatalogReader>,
        checkpoints: Arc<dyn CheckpointRepository>,
        state: Checkpoint,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            detector,
            expander,
            builder,
            indexer,
            reader,
            checkpoints,
            state,
            config,
        }
    }

    /// The current in-memory checkpoint state.
    pub fn checkpoint(&self) -> &Checkpoint {
        &self.state
    }

    /// Run the sync loop until a shutdown signal arrives.
    ///
    /// Shutdown is honored between ticks only; a tick that has started runs
    /// to completion.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), SyncError> {
        info!(
            interval_secs = self.config.sync_interval.as_secs(),
            "Starting catalog sync loop"
        );

        loop {
            self.run_tick().await;

            tokio::select! {
                _ = sleep(self.config.sync_interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Catalog sync loop stopped");
        Ok(())
    }

    /// Run the three refresh flows once, in order.
    pub async fn run_tick(&mut self) {
        for kind in EntityKind::ALL {
            self.run_flow_with_retry(kind).await;
        }
    }

    /// Run one flow to completion, retrying with exponential backoff until
    /// it succeeds. Detection re-derives the id set from the un-advanced
    /// checkpoint on every attempt, so retries reprocess at-least-once.
    async fn run_flow_with_retry(&mut self, kind: EntityKind) {
        // 500ms, 5s, then the 30s cap, with jitter.
        let mut backoff = ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
            .factor(RETRY_FACTOR)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter);

        loop {
            match self.run_flow(kind).await {
                Ok(_) => return,
                Err(e) => {
                    let delay = backoff.next().unwrap_or(MAX_RETRY_DELAY);
                    error!(
                        kind = %kind,
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "Flow failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Execute one refresh flow: detect → expand (non-movie kinds) → fetch →
    /// build → bulk index → commit checkpoint.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn run_flow(&mut self, kind: EntityKind) -> Result<BulkSummary, SyncError> {
        let checkpoint = self.state.get(kind);
        let changed = self.detector.detect(kind, checkpoint).await?;
        if changed.is_empty() {
            debug!(kind = %kind, "No changes detected");
            return Ok(BulkSummary::default());
        }

        let movie_ids = match RelationEdge::for_kind(kind) {
            None => changed.ids.clone(),
            Some(edge) => self.expander.expand(edge, checkpoint, &changed.ids).await?,
        };

        let rows = self.reader.movie_rows(&movie_ids).await?;
        let documents = self.builder.build(&rows, kind);

        let mut summary = BulkSummary::default();
        summary.absorb(
            self.indexer
                .index_documents(&self.config.movies_index, &documents.movies)
                .await?,
        );
        match kind {
            EntityKind::Movie => {}
            EntityKind::Genre => summary.absorb(
                self.indexer
                    .index_documents(&self.config.genres_index, &documents.genres)
                    .await?,
            ),
            EntityKind::Person => summary.absorb(
                self.indexer
                    .index_documents(&self.config.persons_index, &documents.persons)
                    .await?,
            ),
        }

        if summary.failed() > 0 {
            // Those documents will not be retried until their source rows
            // are modified again; the commit below moves past them.
            warn!(
                kind = %kind,
                failed = summary.failed(),
                "Committing checkpoint past a batch with rejected documents"
            );
        }

        self.state.advance(kind, changed.next_checkpoint);
        self.checkpoints.save(&self.state).await?;

        info!(
            kind = %kind,
            indexed = summary.indexed,
            failed = summary.failed(),
            checkpoint = %timestamp::format_timestamp(&changed.next_checkpoint),
            "Flow committed"
        );
        Ok(summary)
    }
}
