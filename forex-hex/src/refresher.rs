//! The refresher cycle: fetch -> store-write -> publish.
//!
//! Stateless between invocations and safe to re-enter; the store write is
//! last-writer-wins. Invoked externally on a schedule (one-shot process per
//! cycle).

use tracing::{error, info};

use forex_types::{RateSource, RateStore, RefreshError};

/// Orchestrates one refresh cycle against the injected ports.
pub struct Refresher<S: RateSource, T: RateStore> {
    source: S,
    store: T,
}

impl<S: RateSource, T: RateStore> Refresher<S, T> {
    /// Creates a refresher over an upstream source and a shared store.
    pub fn new(source: S, store: T) -> Self {
        Self { source, store }
    }

    /// Runs one cycle and returns the number of rates published.
    ///
    /// An upstream failure leaves the store byte-identical to its pre-call
    /// state - staleness is preferred over emptiness. The notification is
    /// published strictly after the write commits; if the publish itself
    /// fails the cycle reports `Unexpected` but the written table stands,
    /// and readers catch up on the next cycle.
    pub async fn refresh(&self) -> Result<usize, RefreshError> {
        let rates = self.source.fetch_all().await.map_err(|e| {
            error!(error = %e, "Upstream fetch failed, leaving store untouched");
            RefreshError::from(e)
        })?;

        let count = rates.len();
        self.store.set_rates(&rates).await?;
        self.store.publish_rates_updated().await?;

        info!(count, "Rate table refreshed and notification published");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use rust_decimal_macros::dec;

    use forex_types::{Currency, Pair, Rate, StoreError, UpstreamError};

    use super::*;

    struct StubSource {
        result: Mutex<Option<Result<Vec<Rate>, UpstreamError>>>,
    }

    impl StubSource {
        fn ok(rates: Vec<Rate>) -> Self {
            Self {
                result: Mutex::new(Some(Ok(rates))),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(UpstreamError::LookupFailed(
                    "upstream returned 500".to_string(),
                )))),
            }
        }
    }

    #[async_trait::async_trait]
    impl RateSource for StubSource {
        async fn fetch_all(&self) -> Result<Vec<Rate>, UpstreamError> {
            self.result.lock().unwrap().take().expect("fetched twice")
        }
    }

    #[derive(Debug, PartialEq)]
    enum Op {
        Set(usize),
        Publish,
    }

    /// Store recording the operations applied to it, in order.
    struct RecordingStore {
        ops: Mutex<Vec<Op>>,
        value: Mutex<Option<Vec<Rate>>>,
        fail_set: bool,
        fail_publish: bool,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                ops: Mutex::new(Vec::new()),
                value: Mutex::new(None),
                fail_set: false,
                fail_publish: false,
            }
        }

        fn ops(&self) -> Vec<Op> {
            std::mem::take(&mut self.ops.lock().unwrap())
        }
    }

    #[async_trait::async_trait]
    impl RateStore for RecordingStore {
        async fn get_rates(&self) -> Result<Option<Vec<Rate>>, StoreError> {
            Ok(self.value.lock().unwrap().clone())
        }

        async fn set_rates(&self, rates: &[Rate]) -> Result<(), StoreError> {
            if self.fail_set {
                return Err(StoreError::Command("SET failed".to_string()));
            }
            *self.value.lock().unwrap() = Some(rates.to_vec());
            self.ops.lock().unwrap().push(Op::Set(rates.len()));
            Ok(())
        }

        async fn publish_rates_updated(&self) -> Result<(), StoreError> {
            if self.fail_publish {
                return Err(StoreError::Command("PUBLISH failed".to_string()));
            }
            self.ops.lock().unwrap().push(Op::Publish);
            Ok(())
        }
    }

    fn sample_rates() -> Vec<Rate> {
        vec![
            Rate::new(
                Pair::new(Currency::usd(), Currency::parse("EUR").unwrap()),
                dec!(0.85),
                Utc::now(),
            ),
            Rate::new(
                Pair::new(Currency::parse("EUR").unwrap(), Currency::usd()),
                dec!(1.18),
                Utc::now(),
            ),
        ]
    }

    #[tokio::test]
    async fn test_successful_cycle_sets_then_publishes() {
        let refresher = Refresher::new(StubSource::ok(sample_rates()), RecordingStore::new());

        let count = refresher.refresh().await.unwrap();

        assert_eq!(count, 2);
        // write happens-before publish
        assert_eq!(refresher.store.ops(), vec![Op::Set(2), Op::Publish]);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_store_untouched() {
        let store = RecordingStore::new();
        *store.value.lock().unwrap() = Some(sample_rates());

        let refresher = Refresher::new(StubSource::failing(), store);
        let err = refresher.refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Upstream(_)));
        assert!(refresher.store.ops().is_empty());
        // prior blob still in place
        assert_eq!(
            refresher.store.value.lock().unwrap().as_ref().unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_set_failure_is_unexpected_and_skips_publish() {
        let mut store = RecordingStore::new();
        store.fail_set = true;

        let refresher = Refresher::new(StubSource::ok(sample_rates()), store);
        let err = refresher.refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Unexpected(_)));
        assert!(refresher.store.ops().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_after_set_is_unexpected() {
        let mut store = RecordingStore::new();
        store.fail_publish = true;

        let refresher = Refresher::new(StubSource::ok(sample_rates()), store);
        let err = refresher.refresh().await.unwrap_err();

        // half-updated cycle: the written table stands
        assert!(matches!(err, RefreshError::Unexpected(_)));
        assert_eq!(refresher.store.ops(), vec![Op::Set(2)]);
        assert!(refresher.store.value.lock().unwrap().is_some());
    }
}
