use crate::constants::{
    DEFAULT_CRYPTO_DATA_DIR, DEFAULT_PORT, DEFAULT_RATE_LIMIT_DURATION_MINUTES,
    DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_SCAN_INTERVAL_MS, DEFAULT_TIMEZONE,
};
use crate::error::{AppError, Result};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Get crypto data directory from environment variable or use default
pub fn get_crypto_data_dir() -> PathBuf {
    std::env::var("CRYPTO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CRYPTO_DATA_DIR))
}

/// Delay between the end of one scan and the start of the next
pub fn get_scan_interval() -> Duration {
    Duration::from_millis(env_or_default("CRYPTO_SCAN_INTERVAL_MS", DEFAULT_SCAN_INTERVAL_MS))
}

/// Time zone used to turn epoch millis into wall-clock time
pub fn get_timezone() -> Result<Tz> {
    let name = std::env::var("CRYPTO_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
    parse_timezone(&name)
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| AppError::Config(format!("Unknown time zone '{}': {}", name, e)))
}

pub fn get_port() -> u16 {
    env_or_default("PORT", DEFAULT_PORT)
}

/// Per-client request budget: (capacity, refill period)
pub fn get_rate_limit() -> (u32, Duration) {
    let requests = env_or_default("RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS);
    let minutes = env_or_default(
        "RATE_LIMIT_DURATION_MINUTES",
        DEFAULT_RATE_LIMIT_DURATION_MINUTES,
    );
    (requests, Duration::from_secs(minutes.saturating_mul(60)))
}

/// Initialize tracing once; `RUST_LOG` overrides the default `info` level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}

fn env_or_default<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => parse_or_default(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = raw, %default, "Invalid config value, using default");
            default
        }
    }
}
