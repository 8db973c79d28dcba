use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::constants::INVALID_PRICE;

/// Single price observation for one asset
///
/// The timestamp is wall-clock time in the zone used at ingestion, so
/// calendar-day comparisons (`date()`) happen in that same zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    timestamp: NaiveDateTime,
    symbol: String,
    price: f64,
}

impl PriceRecord {
    /// Create a new record, upper-casing the symbol
    pub fn new(timestamp: NaiveDateTime, symbol: &str, price: f64) -> Self {
        Self {
            timestamp,
            symbol: symbol.to_uppercase(),
            price,
        }
    }

    /// Build a record from epoch milliseconds, converted to wall-clock time in `tz`
    ///
    /// Returns `None` when the millisecond value is outside chrono's range.
    pub fn from_epoch_millis(millis: i64, symbol: &str, price: f64, tz: &Tz) -> Option<Self> {
        let utc = DateTime::from_timestamp_millis(millis)?;
        let local = tz.from_utc_datetime(&utc.naive_utc()).naive_local();
        Some(Self::new(local, symbol, price))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// False for the sentinel zero price
    pub fn is_valid(&self) -> bool {
        self.price != INVALID_PRICE
    }
}
