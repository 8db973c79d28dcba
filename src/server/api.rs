use crate::error::{AppError, ErrorKind};
use crate::models::CryptoStatistics;
use crate::server::AppState;
use crate::services::{CryptoService, HealthStats};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::SymbolNotFound | ErrorKind::NoDataForDate => StatusCode::NOT_FOUND,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::ScanFault | ErrorKind::DataProcessing | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let message = match self.kind() {
            ErrorKind::DataProcessing => format!("Error processing crypto data: {}", self),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// GET /api/crypto/normalized - All cryptos sorted by normalized range, highest first
#[instrument(skip(service))]
pub async fn get_all_statistics_handler(
    State(service): State<CryptoService>,
) -> Result<Json<Vec<CryptoStatistics>>, AppError> {
    let stats = service.all_statistics().await?;
    Ok(Json(stats))
}

/// GET /api/crypto/{symbol}/statistics - Oldest/newest/min/max for one crypto
#[instrument(skip(service))]
pub async fn get_statistics_handler(
    State(service): State<CryptoService>,
    Path(symbol): Path<String>,
) -> Result<Json<CryptoStatistics>, AppError> {
    let stats = service.statistics_for(&symbol).await?;
    Ok(Json(stats))
}

/// Query parameters for /api/crypto/highest-normalized
#[derive(Debug, Deserialize)]
pub struct HighestNormalizedQuery {
    /// Day to analyze (YYYY-MM-DD)
    pub date: Option<String>,
}

/// GET /api/crypto/highest-normalized?date=2022-01-01 - Crypto with the widest range that day
///
/// Responds with the bare symbol as plain text.
#[instrument(skip(service))]
pub async fn get_highest_normalized_handler(
    State(service): State<CryptoService>,
    Query(params): Query<HighestNormalizedQuery>,
) -> Result<String, AppError> {
    let date = parse_date(params.date.as_deref())?;
    service.highest_normalized_for(date).await
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    let Some(raw) = raw else {
        return Err(AppError::InvalidInput(
            "Missing date parameter. Expected YYYY-MM-DD".to_string(),
        ));
    };

    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        warn!(date = %raw, "Invalid date format");
        AppError::InvalidInput(format!("Invalid date format '{}'. Expected YYYY-MM-DD", raw))
    })
}

/// GET /health - Scan and store statistics
#[instrument(skip(app_state))]
pub async fn health_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    let mut health_stats: HealthStats = app_state.health_stats.read().await.clone();

    let store = app_state.service.store();
    health_stats.symbols_count = store.symbol_count().await;
    health_stats.records_count = store.record_count().await;
    health_stats.uptime_secs = app_state.started_at.elapsed().as_secs();
    health_stats.current_system_time = Utc::now().to_rfc3339();

    debug!(
        symbols = health_stats.symbols_count,
        records = health_stats.records_count,
        "Returning health stats"
    );

    (StatusCode::OK, Json(health_stats)).into_response()
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> impl IntoResponse {
    info!("Unknown route requested");
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}
