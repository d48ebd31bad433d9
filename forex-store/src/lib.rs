//! # Forex Store
//!
//! Valkey adapter for the shared rate table.
//! This crate provides the concrete implementation of the `RateStore` port
//! plus the dedicated pub/sub subscriber resource.

pub mod valkey;

pub use valkey::{ValkeyStore, ValkeySubscriber, RATES_KEY, RATES_UPDATED_CHANNEL};
