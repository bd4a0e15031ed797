//! PostgreSQL implementation of the checkpoint repository.
//!
//! Persists the whole checkpoint map as one JSON value under a single key in
//! a `sync_state` table, upserted wholesale after each commit.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use catalog_indexer_shared::Checkpoint;

use crate::errors::CheckpointError;
use crate::interfaces::CheckpointRepository;

/// The one key the pipeline's state lives under.
const STATE_KEY: &str = "data";

const ENSURE_SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS sync_state (\
        key TEXT PRIMARY KEY, \
        data JSONB NOT NULL\
    )";

const LOAD_STATE: &str = "SELECT data FROM sync_state WHERE key = $1";

const SAVE_STATE: &str = "\
    INSERT INTO sync_state (key, data) VALUES ($1, $2) \
    ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data";

/// Checkpoint repository backed by a PostgreSQL `sync_state` table.
pub struct PostgresCheckpointRepository {
    pool: sqlx::PgPool,
}

impl PostgresCheckpointRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Create the state table if it does not exist. Called once at startup;
    /// failure here is fatal.
    pub async fn ensure_schema(&self) -> Result<(), CheckpointError> {
        sqlx::query(ENSURE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CheckpointRepository for PostgresCheckpointRepository {
    async fn load(&self) -> Result<Checkpoint, CheckpointError> {
        let row: Option<(Value,)> = sqlx::query_as(LOAD_STATE)
            .bind(STATE_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((value,)) => {
                let checkpoint: Checkpoint = serde_json::from_value(value)?;
                debug!("Loaded checkpoint state");
                Ok(checkpoint)
            }
            None => {
                debug!("No stored checkpoint state, starting from scratch");
                Ok(Checkpoint::new())
            }
        }
    }

    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let value = serde_json::to_value(checkpoint)?;

        sqlx::query(SAVE_STATE)
            .bind(STATE_KEY)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
