//! Currency pairs and quoted rates.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::Currency;

/// An ordered currency pair. `(A, B)` and `(B, A)` are distinct pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub from: Currency,
    pub to: Currency,
}

impl Pair {
    /// Creates a new ordered pair.
    pub fn new(from: Currency, to: Currency) -> Self {
        Self { from, to }
    }

    /// True for same-currency pairs, which always rate at 1.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// All ordered distinct pairs over the tracked set (9 x 8 = 72),
    /// in deterministic order. This is the refresher's batch request and
    /// the invariant shape of the stored rate table.
    pub fn all_tracked() -> Vec<Pair> {
        let tracked = Currency::tracked();
        tracked
            .iter()
            .flat_map(|from| {
                tracked
                    .iter()
                    .filter(move |to| *to != from)
                    .map(move |to| Pair::new(from.clone(), to.clone()))
            })
            .collect()
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// A quoted exchange rate.
///
/// Rates are immutable once created - an update is a new `Rate`. The serde
/// shape is the element shape of the stored rate table:
/// `{"pair":{"from":..,"to":..},"price":"..","timestamp":".."}`.
/// The price serializes as a string so no precision is lost in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub pair: Pair,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Rate {
    /// Creates a new rate.
    pub fn new(pair: Pair, price: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            pair,
            price,
            timestamp,
        }
    }

    /// The implicit same-currency rate: price 1, quoted now.
    /// Never stored, only synthesized on demand.
    pub fn identity(currency: Currency) -> Self {
        Self {
            pair: Pair::new(currency.clone(), currency),
            price: Decimal::ONE,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_pairs_are_directional() {
        let usd_eur = Pair::new(Currency::usd(), Currency::parse("EUR").unwrap());
        let eur_usd = Pair::new(Currency::parse("EUR").unwrap(), Currency::usd());
        assert_ne!(usd_eur, eur_usd);
    }

    #[test]
    fn test_all_tracked_is_72_distinct_ordered_pairs() {
        let pairs = Pair::all_tracked();
        assert_eq!(pairs.len(), 72);

        let mut seen = std::collections::HashSet::new();
        for pair in &pairs {
            assert!(!pair.is_identity(), "identity pair {} in batch", pair);
            assert!(seen.insert(pair.clone()), "duplicate pair {}", pair);
        }
    }

    #[test]
    fn test_identity_rate() {
        let rate = Rate::identity(Currency::usd());
        assert_eq!(rate.price, Decimal::ONE);
        assert!(rate.pair.is_identity());
    }

    #[test]
    fn test_rate_serde_shape() {
        let rate = Rate::new(
            Pair::new(Currency::usd(), Currency::parse("EUR").unwrap()),
            dec!(0.85),
            Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap(),
        );

        let json = serde_json::to_value(&rate).unwrap();
        assert_eq!(json["pair"]["from"], "USD");
        assert_eq!(json["pair"]["to"], "EUR");
        assert_eq!(json["price"], "0.85");
        assert_eq!(json["timestamp"], "2026-02-10T00:00:00Z");
    }

    #[test]
    fn test_high_precision_price_round_trips() {
        let rate = Rate::new(
            Pair::new(Currency::usd(), Currency::parse("JPY").unwrap()),
            Decimal::from_str_exact("110.123456789012345678").unwrap(),
            Utc::now(),
        );

        let json = serde_json::to_string(&rate).unwrap();
        let back: Rate = serde_json::from_str(&json).unwrap();
        assert_eq!(back.price, rate.price);
    }

    #[test]
    fn test_table_with_unknown_code_fails_element_wise() {
        let json = r#"[{"pair":{"from":"USD","to":"ZZZ"},"price":"0.85","timestamp":"2026-02-10T00:00:00Z"}]"#;
        let result: Result<Vec<Rate>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
