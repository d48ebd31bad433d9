//! # Forex OneFrame
//!
//! Outbound HTTP adapter for the OneFrame quote provider.
//!
//! OneFrame enforces a hard daily quota, so the client never fetches a
//! single pair: [`OneFrameClient::fetch_all`] batches every tracked ordered
//! pair into one GET. Decoding is defensive - a row with an unknown
//! currency code is dropped instead of failing the batch - and transient
//! failures are retried with exponential backoff.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use forex_types::{Currency, Pair, Rate, RateSource, UpstreamError};

/// First inter-attempt delay; doubles on every subsequent retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Configuration for the OneFrame client.
#[derive(Debug, Clone)]
pub struct OneFrameConfig {
    /// Full URL of the batch rates endpoint.
    pub base_url: String,
    /// Auth token, sent in the `token` header.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
}

/// HTTP client for the OneFrame quote provider.
///
/// Stateless with respect to callers; one instance is shared across tasks.
pub struct OneFrameClient {
    http: Client,
    base_url: String,
    token: String,
    max_retries: u32,
    initial_backoff: Duration,
}

/// One row of the upstream response.
///
/// Currency codes stay raw strings at this layer so a single invalid row
/// cannot poison the whole batch decode; `bid` and `ask` are on the wire
/// but never consumed, so they are not declared.
#[derive(Debug, Deserialize)]
struct OneFrameRate {
    from: String,
    to: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    price: Decimal,
    time_stamp: String,
}

impl OneFrameClient {
    /// Creates a new client with its own connection pool.
    pub fn new(config: OneFrameConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::LookupFailed(format!("building http client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
            max_retries: config.max_retries,
            initial_backoff: INITIAL_BACKOFF,
        })
    }

    /// Fetches rates for all 72 tracked ordered pairs in one batch call,
    /// retrying transient failures.
    ///
    /// Transport errors, non-2xx statuses and decode failures are all
    /// retryable; after `max_retries` extra attempts the last error is
    /// returned. The backoff sleep is a plain `tokio::time::sleep`, so
    /// dropping the future cancels promptly.
    pub async fn fetch_all(&self) -> Result<Vec<Rate>, UpstreamError> {
        let mut delays = self.backoff_delays();
        loop {
            match self.fetch_once().await {
                Ok(rates) => return Ok(rates),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        debug!(error = %err, delay_ms = delay.as_millis() as u64, "Upstream fetch failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    async fn fetch_once(&self) -> Result<Vec<Rate>, UpstreamError> {
        let query: Vec<(&str, String)> = Pair::all_tracked()
            .iter()
            .map(|pair| ("pair", format!("{}{}", pair.from.code(), pair.to.code())))
            .collect();

        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .header("token", &self.token)
            .send()
            .await
            .map_err(|e| UpstreamError::LookupFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::LookupFailed(format!(
                "upstream returned {status}"
            )));
        }

        let records: Vec<OneFrameRate> = response
            .json()
            .await
            .map_err(|e| UpstreamError::LookupFailed(format!("decoding response: {e}")))?;

        Ok(records.into_iter().filter_map(into_rate).collect())
    }

    /// Inter-attempt delays: 100ms, 200ms, 400ms, ... - exponential,
    /// factor 2, no jitter, one entry per permitted retry.
    fn backoff_delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|i| self.initial_backoff * 2u32.pow(i))
    }
}

#[async_trait::async_trait]
impl RateSource for OneFrameClient {
    async fn fetch_all(&self) -> Result<Vec<Rate>, UpstreamError> {
        OneFrameClient::fetch_all(self).await
    }
}

/// Maps one wire row to a domain rate, or drops it.
///
/// Rows with a non-whitelisted currency are dropped silently (logged at
/// debug). An unparseable `time_stamp` does not drop the row - the current
/// instant is substituted, matching the upstream contract's permissive
/// stance.
fn into_rate(record: OneFrameRate) -> Option<Rate> {
    let from = match Currency::parse(&record.from) {
        Ok(c) => c,
        Err(_) => {
            debug!(code = %record.from, "Dropping upstream row with unknown currency");
            return None;
        }
    };
    let to = match Currency::parse(&record.to) {
        Ok(c) => c,
        Err(_) => {
            debug!(code = %record.to, "Dropping upstream row with unknown currency");
            return None;
        }
    };

    let timestamp = match DateTime::parse_from_rfc3339(&record.time_stamp) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => {
            warn!(time_stamp = %record.time_stamp, "Unparseable upstream timestamp, substituting current time");
            Utc::now()
        }
    };

    Some(Rate::new(Pair::new(from, to), record.price, timestamp))
}
