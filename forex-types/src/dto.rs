//! Data Transfer Objects for the HTTP boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Currency, Rate};

/// The `GET /rates` response body.
///
/// Unlike the stored rate table, the price here is a JSON number - that is
/// the shape API clients expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateResponse {
    pub from: Currency,
    pub to: Currency,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl From<Rate> for RateResponse {
    fn from(rate: Rate) -> Self {
        Self {
            from: rate.pair.from,
            to: rate.pair.to,
            price: rate.price,
            timestamp: rate.timestamp,
        }
    }
}
