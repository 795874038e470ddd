use anyhow::{Context, Result};
use std::time::Duration;

use crate::matching::DEFAULT_MATCH_DELAY_MS;

const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a value that fails to parse aborts startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub match_delay: Duration,
    pub max_body_bytes: usize,
    /// Sessions untouched for this long are disposed by the reaper.
    pub session_idle_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            match_delay: Duration::from_millis(DEFAULT_MATCH_DELAY_MS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: parse_or("PORT", &lookup, defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            match_delay: parse_or("MATCH_DELAY_MS", &lookup, DEFAULT_MATCH_DELAY_MS)
                .map(Duration::from_millis)
                .context("MATCH_DELAY_MS must be a whole number of milliseconds")?,
            max_body_bytes: parse_or("MAX_BODY_BYTES", &lookup, defaults.max_body_bytes)
                .context("MAX_BODY_BYTES must be a whole number of bytes")?,
            session_idle_ttl: parse_or(
                "SESSION_IDLE_TTL_SECS",
                &lookup,
                DEFAULT_SESSION_IDLE_TTL_SECS,
            )
            .map(Duration::from_secs)
            .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}
