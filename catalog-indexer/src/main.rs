//! Catalog Indexer Main Entry Point
//!
//! This is the main binary for the catalog indexer. It polls the relational
//! catalog for modifications and keeps the search index synchronized.

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_indexer::{Dependencies, IndexerError};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_indexer=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!(
        service_name = "catalog-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), IndexerError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting catalog indexer");

    let mut deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run().await {
        Ok(()) => {
            info!("Catalog indexer stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Catalog indexer failed");
            Err(e.into())
        }
    }
}
