//! Rate service facade.
//!
//! The thin contract between the HTTP layer and the derivation engine.
//! Every engine failure collapses into the single `LookupFailed` variant:
//! a cold cache and an unknown pair are deliberately indistinguishable to
//! clients, so operational state never leaks. Operators tell them apart in
//! the logs.

use tracing::debug;

use forex_types::{LookupError, Pair, Rate};

use crate::engine::RateEngine;

/// Application service for rate lookups.
#[derive(Clone)]
pub struct RateService {
    engine: RateEngine,
}

impl RateService {
    /// Creates a new rate service over the given engine.
    pub fn new(engine: RateEngine) -> Self {
        Self { engine }
    }

    /// Looks up the rate for an ordered pair.
    pub fn get(&self, pair: &Pair) -> Result<Rate, LookupError> {
        self.engine.get(pair).map_err(|e| {
            debug!(pair = %pair, error = %e, "Rate lookup failed");
            LookupError::from(e)
        })
    }

    /// True once the snapshot behind the engine has been populated.
    pub fn is_ready(&self) -> bool {
        self.engine.has_snapshot()
    }
}
