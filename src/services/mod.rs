mod crypto_service;
pub mod csv_parser;
pub mod directory_scanner;
mod health;
pub mod series_store;
pub mod statistics;

pub use crypto_service::CryptoService;
pub use directory_scanner::{symbol_from_file_name, DirectoryScanner, ScanReport};
pub use health::{HealthStats, SharedHealthStats};
pub use series_store::{SeriesStore, SharedSeriesStore};
