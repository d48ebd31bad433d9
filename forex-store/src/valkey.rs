//! Valkey-backed rate store.
//!
//! The canonical rate table lives under a single key as one JSON array, so
//! a SET is atomic from every reader's perspective. Update notifications go
//! over a pub/sub channel. Two connection resources are involved: command
//! traffic (GET/SET/PUBLISH) shares one multiplexed connection, while the
//! subscriber holds its own - a subscribed connection refuses other
//! commands.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, warn};

use forex_types::{Rate, RateStore, StoreError};

/// Key holding the canonical rate table.
pub const RATES_KEY: &str = "rates";

/// Channel carrying fire-and-forget update notifications.
pub const RATES_UPDATED_CHANNEL: &str = "rates_updated";

/// Command-side store adapter (GET/SET/PUBLISH).
///
/// Cheap to clone; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct ValkeyStore {
    conn: MultiplexedConnection,
}

impl ValkeyStore {
    /// Connects to the store at the given URI.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(uri).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl RateStore for ValkeyStore {
    async fn get_rates(&self) -> Result<Option<Vec<Rate>>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(RATES_KEY)
            .await
            .map_err(|e| StoreError::Command(e.to_string()))?;

        Ok(raw.as_deref().and_then(decode_rates))
    }

    async fn set_rates(&self, rates: &[Rate]) -> Result<(), StoreError> {
        let blob = encode_rates(rates)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(RATES_KEY, blob)
            .await
            .map_err(|e| StoreError::Command(e.to_string()))?;
        Ok(())
    }

    async fn publish_rates_updated(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        // Payload is irrelevant; only the fact of a message matters.
        let subscribers: i64 = conn
            .publish(RATES_UPDATED_CHANNEL, 1)
            .await
            .map_err(|e| StoreError::Command(e.to_string()))?;
        debug!(subscribers, channel = RATES_UPDATED_CHANNEL, "Published rates-updated notification");
        Ok(())
    }
}

/// Subscriber-side resource, held separately from command traffic.
pub struct ValkeySubscriber {
    client: redis::Client,
}

impl ValkeySubscriber {
    /// Prepares a subscriber for the store at the given URI. No connection
    /// is opened until [`ValkeySubscriber::subscribe`].
    pub fn new(uri: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(uri).map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    /// Opens a dedicated pub/sub connection and returns the stream of
    /// update notifications, one unit per received message.
    ///
    /// The returned stream is single-use; the subscription is restarted by
    /// calling `subscribe` again. The stream ends if the connection drops.
    pub async fn subscribe(
        &self,
    ) -> Result<Pin<Box<dyn Stream<Item = ()> + Send + Sync>>, StoreError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        pubsub
            .subscribe(RATES_UPDATED_CHANNEL)
            .await
            .map_err(|e| StoreError::Command(e.to_string()))?;

        Ok(Box::pin(pubsub.into_on_message().map(|_msg| ())))
    }
}

/// Serializes the rate table to its canonical JSON blob.
fn encode_rates(rates: &[Rate]) -> Result<String, StoreError> {
    serde_json::to_string(rates).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decodes the stored blob, degrading to `None` on any failure.
///
/// A corrupt blob is treated exactly like an absent key: readers fall back
/// to their current snapshot and wait for the next refresh cycle.
fn decode_rates(raw: &str) -> Option<Vec<Rate>> {
    match serde_json::from_str(raw) {
        Ok(rates) => Some(rates),
        Err(e) => {
            warn!(error = %e, "Undecodable rate blob in store, treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use forex_types::{Currency, Pair};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn usd_eur_rate() -> Rate {
        Rate::new(
            Pair::new(Currency::usd(), Currency::parse("EUR").unwrap()),
            dec!(0.85),
            Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_blob_round_trip() {
        let rates = vec![usd_eur_rate()];
        let blob = encode_rates(&rates).unwrap();
        assert_eq!(decode_rates(&blob), Some(rates));
    }

    #[test]
    fn test_blob_shape() {
        let blob = encode_rates(&[usd_eur_rate()]).unwrap();
        assert_eq!(
            blob,
            r#"[{"pair":{"from":"USD","to":"EUR"},"price":"0.85","timestamp":"2026-02-10T00:00:00Z"}]"#
        );
    }

    #[test]
    fn test_high_precision_price_survives_round_trip() {
        let rate = Rate::new(
            Pair::new(Currency::usd(), Currency::parse("JPY").unwrap()),
            Decimal::from_str_exact("110.123456789012345678").unwrap(),
            Utc::now(),
        );
        let blob = encode_rates(std::slice::from_ref(&rate)).unwrap();
        let decoded = decode_rates(&blob).unwrap();
        assert_eq!(decoded[0].price, rate.price);
    }

    #[test]
    fn test_corrupt_json_decodes_as_absent() {
        assert_eq!(decode_rates("{not json"), None);
    }

    #[test]
    fn test_unknown_currency_fails_whole_blob() {
        let blob = r#"[{"pair":{"from":"USD","to":"ZZZ"},"price":"0.85","timestamp":"2026-02-10T00:00:00Z"}]"#;
        assert_eq!(decode_rates(blob), None);
    }

    #[test]
    fn test_wire_literals() {
        assert_eq!(RATES_KEY, "rates");
        assert_eq!(RATES_UPDATED_CHANNEL, "rates_updated");
    }
}
