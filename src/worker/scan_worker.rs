use crate::error::Error;
use crate::services::{DirectoryScanner, ScanReport, SharedHealthStats, SharedSeriesStore};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Everything the scan loop needs, owned so it can move into a spawned task
pub struct ScanWorker {
    pub scanner: DirectoryScanner,
    pub store: SharedSeriesStore,
    pub data_dir: PathBuf,
    pub interval: Duration,
    pub health_stats: SharedHealthStats,
}

impl ScanWorker {
    /// Run one scan and record its outcome in the health stats
    ///
    /// Faults are logged and returned; the store keeps whatever was loaded.
    pub async fn run_cycle(&self, iteration: u64) -> Result<ScanReport, Error> {
        let loop_start = std::time::Instant::now();
        info!(iteration, dir = %self.data_dir.display(), "Scan worker: Starting scan");

        let result = self.scanner.scan(&self.data_dir).await;

        let symbols_count = self.store.symbol_count().await;
        let records_count = self.store.record_count().await;
        {
            let mut health = self.health_stats.write().await;
            health.scan_iteration_count = iteration;
            health.last_scan = Some(Utc::now().to_rfc3339());
            health.last_scan_error = result.as_ref().err().map(|e| e.to_string());
            health.scan_interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
            health.symbols_count = symbols_count;
            health.records_count = records_count;
        }

        match &result {
            Ok(report) => {
                info!(
                    iteration,
                    loaded = report.loaded.len(),
                    skipped = report.skipped,
                    symbols = symbols_count,
                    loop_duration_secs = loop_start.elapsed().as_secs_f64(),
                    "Scan worker: Scan completed"
                );
            }
            Err(e) => {
                error!(iteration, error = %e, "Scan worker: Scan failed, retrying next cycle");
            }
        }

        result
    }

    /// Scan forever, sleeping `interval` between the end of one scan and the next
    ///
    /// The first scan is expected to have run already at startup, so the loop
    /// starts with a sleep.
    #[instrument(skip(self))]
    pub async fn run(self, start_iteration: u64) {
        info!(
            dir = %self.data_dir.display(),
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "Starting scan worker"
        );

        let mut iteration_count = start_iteration;
        loop {
            sleep(self.interval).await;
            iteration_count += 1;
            // Faults are already logged; the next cycle retries
            let _ = self.run_cycle(iteration_count).await;
        }
    }
}
