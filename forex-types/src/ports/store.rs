//! Shared rate-store port.
//!
//! This is the primary outbound port: the refresher writes through it and
//! every API instance reads through it. The subscription side is a separate
//! concrete resource (a blocking subscriber cannot share a command
//! connection), so it is not part of this trait.

use crate::domain::Rate;
use crate::error::StoreError;

/// Port trait for the shared rate store.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync + 'static {
    /// Reads the canonical rate table.
    ///
    /// Returns `None` when the key is absent or the blob fails to decode -
    /// callers treat both as cold state. Only transport failures are errors.
    async fn get_rates(&self) -> Result<Option<Vec<Rate>>, StoreError>;

    /// Replaces the canonical rate table in one atomic single-key write.
    async fn set_rates(&self, rates: &[Rate]) -> Result<(), StoreError>;

    /// Publishes one fire-and-forget notification on the update channel.
    /// A message with no live subscribers is lost; that is acceptable.
    async fn publish_rates_updated(&self) -> Result<(), StoreError>;
}
