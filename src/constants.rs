//! Source file and runtime defaults
//!
//! ## Source File Format
//!
//! Each asset lives in its own `<SYMBOL>_values.csv` file:
//!
//! ```text
//! timestamp,symbol,price
//! 1641009600000,BTC,46813.21
//! ```
//!
//! The header line is skipped, the middle column is ignored.

/// Suffix identifying a price file; the symbol is everything before the first underscore
pub const PRICE_FILE_SUFFIX: &str = "_values.csv";

/// Column indices for price files (0-indexed); column 1 holds the symbol and is not read
pub mod csv_column {
    pub const TIMESTAMP: usize = 0;
    pub const PRICE: usize = 2;
}

/// Sentinel price marking an invalid observation
pub const INVALID_PRICE: f64 = 0.0;

/// Minimum same-day observations for a symbol to compete in the daily ranking
pub const MIN_RECORDS_FOR_DAILY_RANGE: usize = 2;

pub const DEFAULT_CRYPTO_DATA_DIR: &str = "crypto_data";
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_DURATION_MINUTES: u64 = 1;
pub const DEFAULT_PORT: u16 = 8080;
