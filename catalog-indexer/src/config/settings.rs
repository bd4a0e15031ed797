//! Environment-driven settings.

use std::env;
use std::time::Duration;

use crate::IndexerError;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default sleep between sync ticks, in seconds.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 5;

/// Default page size for change detection.
pub const DEFAULT_CHANGE_PAGE_SIZE: i64 = 100;

/// Default page size for bulk indexing.
pub const DEFAULT_BULK_BATCH_SIZE: usize = 100;

/// Default index names.
pub const DEFAULT_MOVIES_INDEX: &str = "movies";
pub const DEFAULT_GENRES_INDEX: &str = "genres";
pub const DEFAULT_PERSONS_INDEX: &str = "persons";

/// Operational parameters, all externally settable.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `OPENSEARCH_URL`: search engine URL (default: http://localhost:9200)
/// - `SYNC_INTERVAL_SECS`: sleep between ticks (default: 5)
/// - `CHANGE_PAGE_SIZE`: change-detection page size (default: 100)
/// - `BULK_BATCH_SIZE`: bulk-indexing page size (default: 100)
/// - `MOVIES_INDEX` / `GENRES_INDEX` / `PERSONS_INDEX`: index names
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub opensearch_url: String,
    pub sync_interval: Duration,
    pub change_page_size: i64,
    pub bulk_batch_size: usize,
    pub movies_index: String,
    pub genres_index: String,
    pub persons_index: String,
}

impl Settings {
    /// Read settings from the environment.
    pub fn from_env() -> Result<Self, IndexerError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| IndexerError::config("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            opensearch_url: env_or("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            sync_interval: Duration::from_secs(parsed_env_or(
                "SYNC_INTERVAL_SECS",
                DEFAULT_SYNC_INTERVAL_SECS,
            )),
            change_page_size: parsed_env_or("CHANGE_PAGE_SIZE", DEFAULT_CHANGE_PAGE_SIZE),
            bulk_batch_size: parsed_env_or("BULK_BATCH_SIZE", DEFAULT_BULK_BATCH_SIZE),
            movies_index: env_or("MOVIES_INDEX", DEFAULT_MOVIES_INDEX),
            genres_index: env_or("GENRES_INDEX", DEFAULT_GENRES_INDEX),
            persons_index: env_or("PERSONS_INDEX", DEFAULT_PERSONS_INDEX),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
