//! ISO-4217 currency codes.
//!
//! Two tiers: the full alphabetic whitelist accepted at the API boundary,
//! and the small tracked subset the refresher actually quotes. The tracked
//! set is kept small because the upstream batch call is quadratic in
//! currency count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// ISO-4217 alphabetic codes accepted at the API boundary.
/// Sorted - `Currency::parse` binary-searches this table.
const ISO_4217: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN",
    "BAM", "BBD", "BDT", "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL",
    "BSD", "BTN", "BWP", "BYN", "BZD", "CAD", "CDF", "CHF", "CLP", "CNY",
    "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP",
    "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD",
    "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR",
    "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD",
    "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU",
    "MUR", "MVR", "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK",
    "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG",
    "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK",
    "SGD", "SHP", "SLE", "SLL", "SOS", "SRD", "SSP", "STN", "SVC", "SYP",
    "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS",
    "UAH", "UGX", "USD", "UYU", "UZS", "VES", "VND", "VUV", "WST", "XAF",
    "XCD", "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

/// Codes the refresher quotes against the upstream.
pub const TRACKED: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "NZD", "SGD",
];

/// A validated ISO-4217 currency code.
///
/// Construction goes through [`Currency::parse`], so a `Currency` value is
/// always a whitelisted code. Deserialization applies the same validation,
/// which makes a stored blob with an unknown code fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Parses and validates a currency code (case-insensitive).
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let code = code.trim().to_uppercase();
        if ISO_4217.binary_search(&code.as_str()).is_ok() {
            Ok(Self(code))
        } else {
            Err(DomainError::UnknownCurrency(code))
        }
    }

    /// Returns the 3-letter code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// The base currency of the upstream's quote table.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// The currencies quoted by the upstream, in request order.
    pub fn tracked() -> Vec<Currency> {
        TRACKED.iter().map(|c| Currency(c.to_string())).collect()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::parse(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_is_sorted() {
        // binary_search in parse depends on this
        let mut sorted = ISO_4217.to_vec();
        sorted.sort_unstable();
        assert_eq!(ISO_4217, sorted.as_slice());
    }

    #[test]
    fn test_every_tracked_code_is_whitelisted() {
        for code in TRACKED {
            assert!(
                Currency::parse(code).is_ok(),
                "tracked code {} missing from whitelist",
                code
            );
        }
    }

    #[test]
    fn test_parse_accepts_lowercase() {
        assert_eq!(Currency::parse("usd").unwrap(), Currency::usd());
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let result = Currency::parse("XYZ");
        assert!(matches!(result, Err(DomainError::UnknownCurrency(_))));
    }

    #[test]
    fn test_whitelisted_but_untracked_parses() {
        // THB passes boundary validation even though the upstream never quotes it
        let thb = Currency::parse("THB").unwrap();
        assert_eq!(thb.code(), "THB");
        assert!(!TRACKED.contains(&thb.code()));
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Currency::usd()).unwrap();
        assert_eq!(json, "\"USD\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::usd());
    }

    #[test]
    fn test_deserialize_rejects_unknown_code() {
        let result: Result<Currency, _> = serde_json::from_str("\"ZZZ\"");
        assert!(result.is_err());
    }
}
