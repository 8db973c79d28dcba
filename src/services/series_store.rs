//! In-memory price store
//!
//! Holds one price series per symbol for the lifetime of the process. A
//! symbol is written at most once: later inserts for a present key are
//! refused, so readers only ever see complete series.

use crate::models::{PriceSeries, SeriesSnapshot};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// Shared series store for passing between tasks
pub type SharedSeriesStore = Arc<SeriesStore>;

#[derive(Debug, Default)]
pub struct SeriesStore {
    data: RwLock<BTreeMap<String, Arc<PriceSeries>>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSeriesStore {
        Arc::new(Self::new())
    }

    /// Publish the full series for `symbol` if the key is absent
    ///
    /// Returns `false` (and drops `series`) when the symbol was already loaded.
    pub async fn insert_once(&self, symbol: &str, series: PriceSeries) -> bool {
        let key = symbol.to_uppercase();
        let mut data = self.data.write().await;
        if data.contains_key(&key) {
            tracing::debug!(symbol = %key, "Symbol already loaded, keeping existing series");
            return false;
        }
        data.insert(key, Arc::new(series));
        true
    }

    pub async fn contains(&self, symbol: &str) -> bool {
        self.data.read().await.contains_key(&symbol.to_uppercase())
    }

    /// Series for `symbol` (case-insensitive)
    pub async fn get(&self, symbol: &str) -> Option<Arc<PriceSeries>> {
        self.data.read().await.get(&symbol.to_uppercase()).cloned()
    }

    /// Cheap copy of every series handle; the lock is released on return
    pub async fn snapshot(&self) -> SeriesSnapshot {
        self.data.read().await.clone()
    }

    pub async fn symbols(&self) -> Vec<String> {
        self.data.read().await.keys().cloned().collect()
    }

    pub async fn symbol_count(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn record_count(&self) -> usize {
        self.data.read().await.values().map(|s| s.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRecord;
    use chrono::NaiveDate;

    fn series(symbol: &str, prices: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PriceRecord::new(base + chrono::Duration::hours(i as i64), symbol, *p))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_once() {
        let store = SeriesStore::new();

        assert!(store.insert_once("btc", series("BTC", &[1.0, 2.0])).await);
        assert!(!store.insert_once("BTC", series("BTC", &[9.0])).await);

        let stored = store.get("Btc").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].price(), 1.0);
    }

    #[tokio::test]
    async fn test_counts_and_symbols() {
        let store = SeriesStore::new();
        store.insert_once("ETH", series("ETH", &[1.0, 2.0, 3.0])).await;
        store.insert_once("BTC", series("BTC", &[1.0])).await;

        assert_eq!(store.symbol_count().await, 2);
        assert_eq!(store.record_count().await, 4);
        assert_eq!(store.symbols().await, vec!["BTC".to_string(), "ETH".to_string()]);
        assert!(store.contains("eth").await);
        assert!(!store.contains("DOGE").await);
        assert!(store.get("DOGE").await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = SeriesStore::new();
        store.insert_once("BTC", series("BTC", &[1.0])).await;

        let snapshot = store.snapshot().await;
        store.insert_once("ETH", series("ETH", &[1.0])).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.symbol_count().await, 2);
    }
}
