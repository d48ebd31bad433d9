//! Rate derivation from the snapshot.
//!
//! The stored table is base-relative (everything quoted against USD, both
//! directions), so any ordered pair resolves by direct lookup or by
//! composing the two USD legs.

use std::collections::HashMap;

use forex_types::{Currency, Pair, Rate, ServiceError};

use crate::cache::SnapshotCache;

/// Derives the rate for any requested ordered pair.
#[derive(Clone)]
pub struct RateEngine {
    cache: SnapshotCache,
}

impl RateEngine {
    /// Creates an engine reading from the given snapshot cache.
    pub fn new(cache: SnapshotCache) -> Self {
        Self { cache }
    }

    /// True once the snapshot has been populated by a sync.
    pub fn has_snapshot(&self) -> bool {
        self.cache.get_rates().is_some()
    }

    /// Resolves a pair to a rate.
    ///
    /// Same-currency pairs rate at 1 regardless of snapshot state. An
    /// uninitialized snapshot is `ServiceUnavailable`; anything the table
    /// cannot derive is `PairNotFound`.
    pub fn get(&self, pair: &Pair) -> Result<Rate, ServiceError> {
        if pair.is_identity() {
            return Ok(Rate::identity(pair.from.clone()));
        }

        let snapshot = self
            .cache
            .get_rates()
            .ok_or(ServiceError::ServiceUnavailable)?;

        let table: HashMap<(&Currency, &Currency), &Rate> = snapshot
            .iter()
            .map(|rate| ((&rate.pair.from, &rate.pair.to), rate))
            .collect();

        // Direct hit covers most requests: the upstream quotes both
        // directions of every tracked pair.
        if let Some(rate) = table.get(&(&pair.from, &pair.to)) {
            return Ok((*rate).clone());
        }

        // Fallback: cross-rate through the USD base,
        // price(USD,to) / price(USD,from). This keeps e.g. EUR/JPY
        // derivable even if only USD-relative rows survived. The
        // timestamp is the later of the two legs.
        let usd = Currency::usd();
        if let (Some(usd_from), Some(usd_to)) = (
            table.get(&(&usd, &pair.from)),
            table.get(&(&usd, &pair.to)),
        ) {
            // checked_div guards the zero-price divisor
            if let Some(price) = usd_to.price.checked_div(usd_from.price) {
                let timestamp = usd_from.timestamp.max(usd_to.timestamp);
                return Ok(Rate::new(pair.clone(), price, timestamp));
            }
        }

        Err(ServiceError::PairNotFound(pair.clone()))
    }
}
