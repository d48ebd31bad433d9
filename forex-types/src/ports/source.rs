//! Upstream quote-provider port.

use crate::domain::Rate;
use crate::error::UpstreamError;

/// Port trait for the upstream quote provider.
///
/// Implementations batch-fetch the full tracked pair set in one call; the
/// upstream's daily quota cannot sustain per-request fan-out.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches rates for every tracked ordered pair.
    async fn fetch_all(&self) -> Result<Vec<Rate>, UpstreamError>;
}
