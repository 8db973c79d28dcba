pub mod api;
pub mod rate_limit;

use crate::services::{CryptoService, SharedHealthStats};
use axum::{extract::FromRef, middleware, routing::get, Router};
use rate_limit::SharedRateLimiter;
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: CryptoService,
    pub health_stats: SharedHealthStats,
    pub rate_limiter: SharedRateLimiter,
    pub started_at: Instant,
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for CryptoService {
    fn from_ref(app_state: &AppState) -> CryptoService {
        app_state.service.clone()
    }
}

impl FromRef<AppState> for SharedHealthStats {
    fn from_ref(app_state: &AppState) -> SharedHealthStats {
        app_state.health_stats.clone()
    }
}

impl FromRef<AppState> for SharedRateLimiter {
    fn from_ref(app_state: &AppState) -> SharedRateLimiter {
        app_state.rate_limiter.clone()
    }
}

/// Build the router with all routes and layers
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/crypto/normalized", get(api::get_all_statistics_handler))
        .route("/api/crypto/{symbol}/statistics", get(api::get_statistics_handler))
        .route("/api/crypto/highest-normalized", get(api::get_highest_normalized_handler))
        .route("/health", get(api::health_handler))
        .fallback(api::not_found_handler)
        .layer(middleware::from_fn_with_state(
            app_state.rate_limiter.clone(),
            rate_limit::rate_limit,
        ))
        .layer(cors)
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/crypto/normalized");
    tracing::info!("  GET /api/crypto/{{symbol}}/statistics");
    tracing::info!("  GET /api/crypto/highest-normalized?date=YYYY-MM-DD");
    tracing::info!("  GET /health");
    tracing::info!(
        capacity = app_state.rate_limiter.capacity(),
        "Per-client rate limiting enabled"
    );

    let app = router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
