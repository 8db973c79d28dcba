use crate::error::{AppError, Result};
use crate::models::CryptoStatistics;
use crate::services::series_store::SharedSeriesStore;
use crate::services::statistics;
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Query operations exposed to the HTTP and CLI layers
///
/// Reads go through a snapshot of the store, so a scan publishing a new
/// symbol mid-request never affects a computation already in progress.
#[derive(Clone)]
pub struct CryptoService {
    store: SharedSeriesStore,
}

impl CryptoService {
    pub fn new(store: SharedSeriesStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedSeriesStore {
        &self.store
    }

    #[instrument(skip(self))]
    pub async fn statistics_for(&self, symbol: &str) -> Result<CryptoStatistics> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::InvalidInput("Symbol must not be empty".to_string()));
        }

        info!(symbol, "Calculating statistics for crypto symbol");
        let snapshot = self.store.snapshot().await;
        statistics::statistics_for(&snapshot, symbol).inspect_err(|e| {
            warn!(symbol, error = %e, "No statistics available for crypto symbol");
        })
    }

    #[instrument(skip(self))]
    pub async fn all_statistics(&self) -> Result<Vec<CryptoStatistics>> {
        let snapshot = self.store.snapshot().await;
        let stats = statistics::all_statistics(&snapshot)?;
        info!(count = stats.len(), "Statistics for all cryptos calculated and sorted");
        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn highest_normalized_for(&self, date: NaiveDate) -> Result<String> {
        let snapshot = self.store.snapshot().await;
        match statistics::highest_normalized_for(&snapshot, date) {
            Ok(symbol) => {
                info!(%date, symbol = %symbol, "Highest normalized range crypto found");
                Ok(symbol)
            }
            Err(e) => {
                warn!(%date, error = %e, "No crypto qualifies for date");
                Err(e)
            }
        }
    }
}
