//! Forex refresher role.
//!
//! One-shot process: fetch every tracked pair from the upstream, replace
//! the stored rate table, publish one notification, exit. Scheduled
//! externally (e.g. a CronJob every few minutes). Exit code 0 on a
//! completed cycle, 1 on any failure.

use std::process::ExitCode;

use forex_app::config::RefresherConfig;
use forex_hex::Refresher;
use forex_oneframe::OneFrameClient;
use forex_store::ValkeyStore;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    forex_app::init_tracing();

    match run().await {
        Ok(count) => {
            tracing::info!(count, "Refresh cycle complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Refresh cycle failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<usize> {
    let config = RefresherConfig::from_env()?;

    let source = OneFrameClient::new(config.oneframe)?;
    let store = ValkeyStore::connect(&config.valkey_uri).await?;

    let count = Refresher::new(source, store).refresh().await?;
    Ok(count)
}
