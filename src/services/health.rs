use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health statistics for the scanner and the series store
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStats {
    // Scan worker statistics
    pub scan_iteration_count: u64,
    pub last_scan: Option<String>,
    pub last_scan_error: Option<String>,
    pub scan_interval_ms: u64,

    // Store statistics
    pub symbols_count: usize,
    pub records_count: usize,

    // System info
    pub uptime_secs: u64,
    pub current_system_time: String,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            scan_iteration_count: 0,
            last_scan: None,
            last_scan_error: None,
            scan_interval_ms: crate::constants::DEFAULT_SCAN_INTERVAL_MS,
            symbols_count: 0,
            records_count: 0,
            uptime_secs: 0,
            current_system_time: Utc::now().to_rfc3339(),
        }
    }
}

pub type SharedHealthStats = Arc<RwLock<HealthStats>>;
