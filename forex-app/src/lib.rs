//! # Forex App
//!
//! Process wiring shared by the two binaries:
//! - `forex-api` - long-running HTTP server backed by the snapshot cache
//! - `forex-refresher` - one-shot refresh cycle, scheduled externally
//!
//! Both load configuration from the environment and log through `tracing`.

pub mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the tracing subscriber from `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,forex_hex=debug,forex_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
