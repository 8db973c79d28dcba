use crate::constants::PRICE_FILE_SUFFIX;
use crate::error::{AppError, Result};
use crate::services::csv_parser::parse_price_csv;
use crate::services::series_store::SharedSeriesStore;
use chrono_tz::Tz;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Outcome of a single scan cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Symbols inserted by this scan, in file-name order
    pub loaded: Vec<String>,
    /// Matching files skipped because their symbol was already loaded
    pub skipped: usize,
    /// Records inserted by this scan
    pub records: usize,
}

/// Loads `<SYMBOL>_values.csv` files into the series store, once per symbol
pub struct DirectoryScanner {
    store: SharedSeriesStore,
    timezone: Tz,
}

impl DirectoryScanner {
    pub fn new(store: SharedSeriesStore, timezone: Tz) -> Self {
        Self { store, timezone }
    }

    /// Scan `dir` and load every symbol not yet present in the store
    ///
    /// Fail-fast: the first fault aborts the rest of the scan and is returned
    /// wrapped in `AppError::DirectoryScan`. Symbols loaded before the fault
    /// stay loaded.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn scan(&self, dir: &Path) -> Result<ScanReport> {
        self.scan_inner(dir)
            .await
            .map_err(|e| AppError::scan_fault(dir, e))
    }

    async fn scan_inner(&self, dir: &Path) -> Result<ScanReport> {
        if !dir.is_dir() {
            return Err(AppError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut report = ScanReport::default();

        for (symbol, path) in list_price_files(dir)? {
            if self.store.contains(&symbol).await {
                debug!(symbol = %symbol, "Already loaded, skipping");
                report.skipped += 1;
                continue;
            }

            // File I/O and parsing happen without holding the store lock
            let file = File::open(&path).map_err(|e| {
                AppError::Io(format!("Failed to open {}: {}", path.display(), e))
            })?;
            let prices = parse_price_csv(BufReader::new(file), &symbol, &self.timezone)?;
            let count = prices.len();

            if self.store.insert_once(&symbol, prices).await {
                info!(symbol = %symbol, records = count, file = %path.display(), "Loaded price file");
                report.loaded.push(symbol);
                report.records += count;
            } else {
                report.skipped += 1;
            }
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped,
            records = report.records,
            "Scan completed"
        );

        Ok(report)
    }
}

/// Price files directly under `dir` as (symbol, path), sorted by file name
fn list_price_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir)?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(symbol) = symbol_from_file_name(file_name) else {
            continue;
        };
        if !path.is_file() {
            warn!(path = %path.display(), "Ignoring non-file entry with price file name");
            continue;
        }

        files.push((file_name.to_string(), symbol, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, symbol, path)| (symbol, path)).collect())
}

/// Symbol for a price file name (`btc_values.csv` -> `BTC`)
///
/// Returns `None` when the name does not end in `_values.csv` or the symbol
/// part is empty.
pub fn symbol_from_file_name(file_name: &str) -> Option<String> {
    if !file_name.ends_with(PRICE_FILE_SUFFIX) {
        return None;
    }
    let symbol = file_name.split('_').next().unwrap_or("");
    if symbol.is_empty() {
        return None;
    }
    Some(symbol.to_uppercase())
}
