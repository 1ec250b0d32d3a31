//! offsite entry point.
//!
//! Warms the configured cache generation, activates it, then resolves asset
//! paths read line-by-line from stdin. Logging goes to stderr so resolution
//! results on stdout stay machine-readable.

use std::sync::Arc;

use anyhow::Result;
use offsite_client::FetchClient;
use offsite_controller::{LoggingClients, OfflineCacheController, ResolvedFrom};
use offsite_core::AppConfig;
use offsite_core::store::CacheStorage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(generation = %config.cache_name, assets = config.precache.len(), "starting offsite");

    let storage = CacheStorage::open(&config.db_path).await?;
    let fetcher = Arc::new(FetchClient::from_app_config(&config)?);
    let mut controller = OfflineCacheController::new(config, storage, fetcher, Arc::new(LoggingClients))?;

    controller.install().await?;
    let sweep = controller.activate().await;
    tracing::info!(kept = %sweep.kept, deleted = sweep.deleted.len(), "activation complete");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let reference = line.trim();
        if reference.is_empty() {
            continue;
        }
        match controller.resolve("GET", reference).await {
            Ok(resolution) => {
                let source = match resolution.from {
                    ResolvedFrom::Cache => "cache",
                    ResolvedFrom::Network => "network",
                };
                println!("{} {} {} {}B", reference, resolution.response.status, source, resolution.response.body.len());
            }
            Err(e) => println!("{} error {}", reference, e),
        }
    }

    controller.settle_writes().await;

    Ok(())
}
