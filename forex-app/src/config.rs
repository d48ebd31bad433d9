//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use forex_oneframe::OneFrameConfig;

const DEFAULT_VALKEY_URI: &str = "redis://127.0.0.1:6379";

/// Configuration for the API role.
pub struct ApiConfig {
    pub port: u16,
    pub http_timeout: Duration,
    pub valkey_uri: String,
}

impl ApiConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env_or("PORT", "8080")?,
            http_timeout: Duration::from_millis(env_or("HTTP_TIMEOUT_MS", "5000")?),
            valkey_uri: env::var("VALKEY_URI").unwrap_or_else(|_| DEFAULT_VALKEY_URI.to_string()),
        })
    }
}

/// Configuration for the refresher role.
pub struct RefresherConfig {
    pub valkey_uri: String,
    pub oneframe: OneFrameConfig,
}

impl RefresherConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            valkey_uri: env::var("VALKEY_URI").unwrap_or_else(|_| DEFAULT_VALKEY_URI.to_string()),
            oneframe: OneFrameConfig {
                base_url: env::var("ONEFRAME_BASE_URL")
                    .map_err(|_| anyhow::anyhow!("ONEFRAME_BASE_URL environment variable is required"))?,
                token: env::var("ONEFRAME_TOKEN")
                    .map_err(|_| anyhow::anyhow!("ONEFRAME_TOKEN environment variable is required"))?,
                timeout: Duration::from_millis(env_or("ONEFRAME_TIMEOUT_MS", "5000")?),
                max_retries: env_or("ONEFRAME_MAX_RETRIES", "3")?,
            },
        })
    }
}

fn env_or<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .with_context(|| format!("Invalid value for {key}: {raw}"))
}
