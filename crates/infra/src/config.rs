//! Configuration loading and representation.
//!
//! Everything comes from environment variables. Unset variables take their
//! default; unparsable ones are logged and also fall back to the default, so
//! a typo never stops the process from starting.

use core::str::FromStr;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use bookstore_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "BOOKSTORE_BIND_ADDR";
pub const SNAPSHOT_PATH_VAR: &str = "BOOKSTORE_SNAPSHOT_PATH";
pub const SNAPSHOT_INTERVAL_VAR: &str = "BOOKSTORE_SNAPSHOT_INTERVAL_SECS";
pub const REQUEST_TIMEOUT_VAR: &str = "BOOKSTORE_REQUEST_TIMEOUT_MS";
pub const LOG_FORMAT_VAR: &str = "BOOKSTORE_LOG_FORMAT";

/// Deadline applied to every request by the execution envelope.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub snapshot_path: PathBuf,
    /// `None` keeps the scheduled snapshot writer disabled.
    pub snapshot_interval: Option<Duration>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            snapshot_path: PathBuf::from("database.json"),
            snapshot_interval: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let snapshot_interval = parse_or(&lookup, SNAPSHOT_INTERVAL_VAR, 0u64);

        Self {
            bind_addr: parse_or(&lookup, BIND_ADDR_VAR, defaults.bind_addr),
            snapshot_path: lookup(SNAPSHOT_PATH_VAR)
                .filter(|p| !p.trim().is_empty())
                .map_or(defaults.snapshot_path, PathBuf::from),
            snapshot_interval: (snapshot_interval > 0)
                .then(|| Duration::from_secs(snapshot_interval)),
            request_timeout: match parse_or(&lookup, REQUEST_TIMEOUT_VAR, 0u64) {
                0 => defaults.request_timeout,
                ms => Duration::from_millis(ms),
            },
            log_format: parse_or(&lookup, LOG_FORMAT_VAR, defaults.log_format),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "invalid config value; using default");
                default
            }
        },
    }
}
