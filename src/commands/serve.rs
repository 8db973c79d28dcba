use crate::server::{self, rate_limit::RateLimiter, AppState};
use crate::services::{CryptoService, DirectoryScanner, HealthStats, SeriesStore};
use crate::utils::{get_crypto_data_dir, get_port, get_rate_limit, get_scan_interval, get_timezone};
use crate::worker::ScanWorker;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

pub async fn run(port: Option<u16>, dir: Option<PathBuf>) {
    let port = port.unwrap_or_else(get_port);
    println!("🚀 Starting crypto-recommend server on port {}", port);

    let data_dir = dir.unwrap_or_else(get_crypto_data_dir);
    println!("📁 Crypto directory: {}", data_dir.display());

    let timezone = match get_timezone() {
        Ok(tz) => tz,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    println!("🕐 Time zone: {}", timezone);

    let store = SeriesStore::shared();
    let scanner = DirectoryScanner::new(store.clone(), timezone);
    let interval = get_scan_interval();

    let start_time = Instant::now();
    let shared_health_stats = Arc::new(RwLock::new(HealthStats {
        scan_interval_ms: u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        ..HealthStats::default()
    }));

    let worker = ScanWorker {
        scanner,
        store: store.clone(),
        data_dir,
        interval,
        health_stats: shared_health_stats.clone(),
    };

    // Initial scan before accepting requests
    println!("📊 Loading crypto prices into memory...");
    match worker.run_cycle(1).await {
        Ok(report) => {
            println!("✅ Crypto data loaded successfully:");
            println!("   📈 Active cryptos: {}", store.symbol_count().await);
            println!("   📊 Price records:  {}", report.records);
        }
        Err(e) => {
            eprintln!("⚠️  Warning: Initial scan failed: {}", e);
            eprintln!("   Server will start with whatever was loaded. The scan worker will retry.");
        }
    }

    println!("🔄 Rescanning every {}ms", interval.as_millis());
    tokio::spawn(worker.run(1));

    let (capacity, refill_every) = get_rate_limit();
    let app_state = AppState {
        service: CryptoService::new(store),
        health_stats: shared_health_stats,
        rate_limiter: Arc::new(RateLimiter::new(capacity, refill_every)),
        started_at: start_time,
    };

    if let Err(e) = server::serve(app_state, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
