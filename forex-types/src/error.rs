//! Error types for the forex rate proxy.
//!
//! One enum per layer; layers convert at their boundaries. The HTTP-facing
//! `LookupError` deliberately collapses every engine failure into a single
//! variant so clients cannot distinguish a cold cache from an unknown pair.

use crate::domain::Pair;

/// Domain-level errors (boundary validation).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Upstream quote-provider failures.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Rate lookup failed: {0}")]
    LookupFailed(String),
}

/// Shared-store (Valkey) failures.
///
/// Note that an absent or undecodable blob is NOT an error - `get_rates`
/// reports those as `None`. These variants cover transport and command
/// failures only.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store command error: {0}")]
    Command(String),

    #[error("Store serialization error: {0}")]
    Serialization(String),
}

/// Derivation-engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Snapshot not yet initialized (cold start).
    #[error("Rate service unavailable: no rates loaded yet")]
    ServiceUnavailable,

    /// Snapshot initialized but the pair is not derivable from it.
    #[error("No rate available for {0}")]
    PairNotFound(Pair),
}

/// The single error the rate service facade presents to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Rate lookup failed: {0}")]
    LookupFailed(String),
}

impl From<ServiceError> for LookupError {
    fn from(err: ServiceError) -> Self {
        LookupError::LookupFailed(err.to_string())
    }
}

/// Outcome of one refresher cycle.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The upstream fetch failed; the store was not touched.
    #[error("{0}")]
    Upstream(String),

    /// The fetch succeeded but writing or publishing failed; the store may
    /// be half-updated (set applied, publish lost).
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<UpstreamError> for RefreshError {
    fn from(err: UpstreamError) -> Self {
        RefreshError::Upstream(err.to_string())
    }
}

impl From<StoreError> for RefreshError {
    fn from(err: StoreError) -> Self {
        RefreshError::Unexpected(err.to_string())
    }
}
