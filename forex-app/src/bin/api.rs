//! Forex API role.
//!
//! Long-running process: connects to the store, subscribes to update
//! notifications, runs the snapshot sync job in the background and serves
//! rate lookups over HTTP until terminated.

use std::sync::Arc;

use forex_app::config::ApiConfig;
use forex_hex::inbound::HttpServer;
use forex_hex::{RateEngine, RateService, SnapshotCache};
use forex_store::{ValkeyStore, ValkeySubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    forex_app::init_tracing();

    let config = ApiConfig::from_env()?;
    tracing::info!("Starting forex API on port {}", config.port);
    tracing::info!("Using store: {}", config.valkey_uri);

    // Command connection for reads, dedicated connection for the
    // subscription - a subscribed connection cannot issue commands.
    let store = ValkeyStore::connect(&config.valkey_uri).await?;
    let subscriber = ValkeySubscriber::new(&config.valkey_uri)?;
    let trigger = subscriber.subscribe().await?;

    let (cache, sync_job) = SnapshotCache::with_sync_job(Arc::new(store), trigger);
    let sync_task = tokio::spawn(sync_job.run());

    let service = RateService::new(RateEngine::new(cache));
    let server = HttpServer::new(service, config.http_timeout);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Cancel the sync task before the store connections go away.
    sync_task.abort();
    Ok(())
}
