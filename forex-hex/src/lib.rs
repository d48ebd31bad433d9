//! # Forex Hex
//!
//! Application service layer and HTTP adapter for the forex rate proxy.
//!
//! ## Architecture
//!
//! - `cache` - In-process rate snapshot and its store-driven sync job
//! - `engine` - Rate derivation (direct lookup + USD cross-rates)
//! - `service` - The facade the HTTP layer talks to
//! - `refresher` - One fetch -> store -> publish cycle
//! - `inbound` - HTTP adapter (Axum server)
//!
//! The refresher is generic over the `RateSource` and `RateStore` ports,
//! allowing adapters to be injected at compile time.

pub mod cache;
pub mod engine;
pub mod inbound;
pub mod refresher;
pub mod service;

pub use cache::{SnapshotCache, SyncJob};
pub use engine::RateEngine;
pub use refresher::Refresher;
pub use service::RateService;
