use serde::{Deserialize, Serialize};

/// Price statistics for one symbol, computed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoStatistics {
    pub symbol: String,
    pub oldest_price: f64,
    pub newest_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// (max - min) / min
    pub normalized_range: f64,
}

/// Normalized range of a price set: `(max - min) / min`
///
/// A zero minimum yields infinity or NaN rather than panicking.
pub fn normalized_range(min: f64, max: f64) -> f64 {
    (max - min) / min
}
