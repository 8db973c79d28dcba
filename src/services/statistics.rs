//! Statistics over price series
//!
//! Everything here is a pure function of a [`SeriesSnapshot`] (or a single
//! series). Invalid records are filtered into a private view; stored series
//! are never modified.

use crate::constants::MIN_RECORDS_FOR_DAILY_RANGE;
use crate::error::{AppError, Result};
use crate::models::{normalized_range, CryptoStatistics, PriceRecord, SeriesSnapshot};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Statistics for `symbol` from the given snapshot
pub fn statistics_for(snapshot: &SeriesSnapshot, symbol: &str) -> Result<CryptoStatistics> {
    let key = symbol.to_uppercase();
    match snapshot.get(&key) {
        Some(series) => compute_statistics(&key, series),
        None => Err(AppError::SymbolNotFound(key)),
    }
}

/// Oldest/newest/min/max price and normalized range of one series
///
/// Zero-price records are ignored. Errors with `SymbolNotFound` for an empty
/// series and `NoValidData` when every record is invalid.
pub fn compute_statistics(symbol: &str, series: &[PriceRecord]) -> Result<CryptoStatistics> {
    let symbol = symbol.to_uppercase();
    if series.is_empty() {
        return Err(AppError::SymbolNotFound(symbol));
    }

    let mut valid: Vec<&PriceRecord> = series.iter().filter(|r| r.is_valid()).collect();
    if valid.is_empty() {
        return Err(AppError::NoValidData(symbol));
    }

    // Stable: equal timestamps keep arrival order
    valid.sort_by_key(|r| r.timestamp());

    let oldest_price = valid[0].price();
    let newest_price = valid[valid.len() - 1].price();
    let (min_price, max_price) = price_bounds(valid.iter().map(|r| r.price()));

    let stats = CryptoStatistics {
        normalized_range: normalized_range(min_price, max_price),
        symbol,
        oldest_price,
        newest_price,
        min_price,
        max_price,
    };

    debug!(
        symbol = %stats.symbol,
        oldest = stats.oldest_price,
        newest = stats.newest_price,
        min = stats.min_price,
        max = stats.max_price,
        normalized_range = stats.normalized_range,
        "Statistics calculated"
    );

    Ok(stats)
}

/// Statistics for every symbol, sorted by normalized range (highest first)
///
/// Symbols without valid data are skipped; any other fault aborts the call.
/// Ties keep lexical symbol order.
pub fn all_statistics(snapshot: &SeriesSnapshot) -> Result<Vec<CryptoStatistics>> {
    let mut stats_list = Vec::with_capacity(snapshot.len());

    for (symbol, series) in snapshot {
        match compute_statistics(symbol, series) {
            Ok(stats) => stats_list.push(stats),
            Err(e @ (AppError::SymbolNotFound(_) | AppError::NoValidData(_))) => {
                warn!(symbol = %symbol, error = %e, "Skipping symbol without valid data");
            }
            Err(e) => return Err(e),
        }
    }

    stats_list.sort_by(|a, b| b.normalized_range.total_cmp(&a.normalized_range));
    Ok(stats_list)
}

/// Symbol with the highest intraday normalized range on `date`
///
/// Only symbols with at least two valid records on that calendar day are
/// considered. On a tie the lexically first symbol wins.
pub fn highest_normalized_for(snapshot: &SeriesSnapshot, date: NaiveDate) -> Result<String> {
    let mut best: Option<(&str, f64)> = None;

    for (symbol, series) in snapshot {
        let day_prices: Vec<f64> = series
            .iter()
            .filter(|r| r.is_valid() && r.date() == date)
            .map(|r| r.price())
            .collect();

        if day_prices.len() < MIN_RECORDS_FOR_DAILY_RANGE {
            continue;
        }

        let (min, max) = price_bounds(day_prices.into_iter());
        let range = normalized_range(min, max);

        let is_better = match best {
            Some((_, best_range)) => range > best_range,
            None => !range.is_nan(),
        };
        if is_better {
            best = Some((symbol.as_str(), range));
        }
    }

    best.map(|(symbol, _)| symbol.to_string())
        .ok_or(AppError::NoDataForDate(date))
}

fn price_bounds(prices: impl Iterator<Item = f64>) -> (f64, f64) {
    prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
        (min.min(p), max.max(p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceSeries;
    use chrono::{Duration, NaiveDateTime};
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn hourly(symbol: &str, d: u32, prices: &[f64]) -> PriceSeries {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PriceRecord::new(at(d, 0) + Duration::hours(i as i64), symbol, *p))
            .collect()
    }

    fn snapshot(entries: Vec<(&str, PriceSeries)>) -> SeriesSnapshot {
        entries
            .into_iter()
            .map(|(s, series)| (s.to_string(), Arc::new(series)))
            .collect()
    }

    fn btc_series() -> PriceSeries {
        hourly("BTC", 1, &[46813.21, 46979.61, 47143.98, 46871.09, 47023.24])
    }

    #[test]
    fn test_compute_statistics() {
        let stats = compute_statistics("btc", &btc_series()).unwrap();

        assert_eq!(stats.symbol, "BTC");
        assert_eq!(stats.oldest_price, 46813.21);
        assert_eq!(stats.newest_price, 47023.24);
        assert_eq!(stats.min_price, 46813.21);
        assert_eq!(stats.max_price, 47143.98);
        assert_eq!(stats.normalized_range, (47143.98 - 46813.21) / 46813.21);
        assert!((stats.normalized_range - 0.00705).abs() < 1e-4);
    }

    #[test]
    fn test_compute_statistics_orders_by_time_not_arrival() {
        let mut series = btc_series();
        series.reverse();

        let stats = compute_statistics("BTC", &series).unwrap();
        assert_eq!(stats.oldest_price, 46813.21);
        assert_eq!(stats.newest_price, 47023.24);
    }

    #[test]
    fn test_compute_statistics_filters_zero_prices() {
        let series = vec![
            PriceRecord::new(at(1, 0), "ETH", 0.0),
            PriceRecord::new(at(1, 1), "ETH", 10.0),
            PriceRecord::new(at(1, 2), "ETH", 20.0),
            PriceRecord::new(at(1, 3), "ETH", 0.0),
        ];

        let stats = compute_statistics("ETH", &series).unwrap();
        assert_eq!(stats.oldest_price, 10.0);
        assert_eq!(stats.newest_price, 20.0);
        assert_eq!(stats.min_price, 10.0);
        assert_eq!(stats.normalized_range, 1.0);

        // The input series is untouched
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_compute_statistics_is_repeatable() {
        let series = vec![
            PriceRecord::new(at(1, 0), "ETH", 0.0),
            PriceRecord::new(at(1, 1), "ETH", 10.0),
        ];
        let first = compute_statistics("ETH", &series).unwrap();
        let second = compute_statistics("ETH", &series).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_statistics_empty_and_invalid() {
        let err = compute_statistics("XRP", &[]).unwrap_err();
        assert!(matches!(err, AppError::SymbolNotFound(ref s) if s == "XRP"));

        let zeros = vec![PriceRecord::new(at(1, 0), "XRPS", 0.0)];
        let err = compute_statistics("XRPS", &zeros).unwrap_err();
        assert!(matches!(err, AppError::NoValidData(ref s) if s == "XRPS"));
    }

    #[test]
    fn test_statistics_for_unknown_symbol() {
        let snap = snapshot(vec![("BTC", btc_series())]);

        let err = statistics_for(&snap, "doge").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported or unavailable crypto: DOGE");
        assert!(statistics_for(&snap, "btc").is_ok());
    }

    #[test]
    fn test_all_statistics_sorted_descending() {
        let snap = snapshot(vec![
            ("BTC", btc_series()),
            ("ETH", hourly("ETH", 1, &[100.0, 150.0])),
            ("LTC", hourly("LTC", 1, &[100.0, 110.0])),
        ]);

        let stats = all_statistics(&snap).unwrap();
        let symbols: Vec<&str> = stats.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "LTC", "BTC"]);
        assert!(stats.windows(2).all(|w| w[0].normalized_range >= w[1].normalized_range));
    }

    #[test]
    fn test_all_statistics_ties_keep_lexical_order() {
        let snap = snapshot(vec![
            ("DOT", hourly("DOT", 1, &[1.0, 2.0])),
            ("ADA", hourly("ADA", 1, &[5.0, 10.0])),
        ]);

        let stats = all_statistics(&snap).unwrap();
        assert_eq!(stats[0].symbol, "ADA");
        assert_eq!(stats[1].symbol, "DOT");
    }

    #[test]
    fn test_all_statistics_skips_symbols_without_valid_data() {
        let snap = snapshot(vec![
            ("BTC", btc_series()),
            ("EMPTY", vec![]),
            ("ZERO", hourly("ZERO", 1, &[0.0, 0.0])),
        ]);

        let stats = all_statistics(&snap).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].symbol, "BTC");
    }

    #[test]
    fn test_all_statistics_empty_store() {
        assert!(all_statistics(&SeriesSnapshot::new()).unwrap().is_empty());
    }

    #[test]
    fn test_highest_normalized_for() {
        let mut eth = hourly("ETH", 1, &[100.0, 130.0]);
        eth.extend(hourly("ETH", 2, &[100.0, 101.0]));
        let mut btc = hourly("BTC", 1, &[100.0, 110.0]);
        btc.extend(hourly("BTC", 2, &[100.0, 200.0]));

        let snap = snapshot(vec![("BTC", btc), ("ETH", eth)]);

        assert_eq!(highest_normalized_for(&snap, day(1)).unwrap(), "ETH");
        assert_eq!(highest_normalized_for(&snap, day(2)).unwrap(), "BTC");
    }

    #[test]
    fn test_highest_normalized_requires_two_records() {
        // SOL has a huge spread across days but only one record on day 1
        let mut sol = hourly("SOL", 1, &[1.0]);
        sol.extend(hourly("SOL", 2, &[1000.0]));
        let snap = snapshot(vec![
            ("BTC", hourly("BTC", 1, &[100.0, 101.0])),
            ("SOL", sol),
        ]);

        assert_eq!(highest_normalized_for(&snap, day(1)).unwrap(), "BTC");
    }

    #[test]
    fn test_highest_normalized_no_data_for_date() {
        let snap = snapshot(vec![
            ("BTC", hourly("BTC", 1, &[100.0])),
            ("ETH", hourly("ETH", 2, &[100.0, 120.0])),
        ]);

        let err = highest_normalized_for(&snap, day(1)).unwrap_err();
        assert!(matches!(err, AppError::NoDataForDate(d) if d == day(1)));

        let err = highest_normalized_for(&snap, day(3)).unwrap_err();
        assert!(matches!(err, AppError::NoDataForDate(_)));
    }

    #[test]
    fn test_highest_normalized_tie_breaks_lexically() {
        let snap = snapshot(vec![
            ("XRP", hourly("XRP", 1, &[2.0, 3.0])),
            ("ADA", hourly("ADA", 1, &[10.0, 15.0])),
            ("DOT", hourly("DOT", 1, &[4.0, 6.0])),
        ]);

        assert_eq!(highest_normalized_for(&snap, day(1)).unwrap(), "ADA");
    }

    #[test]
    fn test_highest_normalized_ignores_zero_prices() {
        let snap = snapshot(vec![
            // Only one valid record once the zero is dropped
            ("BTC", hourly("BTC", 1, &[0.0, 100.0])),
            ("ETH", hourly("ETH", 1, &[100.0, 105.0])),
        ]);

        assert_eq!(highest_normalized_for(&snap, day(1)).unwrap(), "ETH");
    }
}
