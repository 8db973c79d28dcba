mod crypto_statistics;
mod price_record;

pub use crypto_statistics::{normalized_range, CryptoStatistics};
pub use price_record::PriceRecord;

use std::collections::BTreeMap;
use std::sync::Arc;

/// Price observations for a single symbol
pub type PriceSeries = Vec<PriceRecord>;

/// Point-in-time view of the store (symbol -> series), in lexical symbol order
pub type SeriesSnapshot = BTreeMap<String, Arc<PriceSeries>>;
