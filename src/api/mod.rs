//! Event Tracker REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! Everything under `/api/v1` requires the `x-api-key` (public key) and
//! `x-api-secret` (private key) headers.
//!
//! ## App
//! - `GET /api/v1/app` - Navigation shell
//!
//! ## Tables
//! - `GET /api/v1/tables` - Table names
//! - `GET /api/v1/tables/:table/schema` - Columns of a table
//! - `GET /api/v1/tables/:table` - Grid view of a table
//!
//! ## Records
//! - `POST /api/v1/stations` - Insert a batch of stations
//! - `POST /api/v1/foods` - Insert a batch of foods
//! - `POST /api/v1/orders` - Insert a batch of orders
//! - `POST /api/v1/staff` - Insert a batch of staff
//! - `POST /api/v1/rosters` - Insert a batch of rosters
//!
//! ## Reports
//! - `GET /api/v1/reports/popularity` - Quantity per food (`?format=chart`)
//! - `GET /api/v1/reports/timeline` - Shift timeline (`?staff=NAME`)
//!
//! ## Dataset
//! - `POST /api/v1/seed` - Load the demo dataset (`?reset=true` replaces)
//! - `DELETE /api/v1/dataset` - Delete every row
//! - `GET /api/v1/export` - Export dataset or one table
//! - `POST /api/v1/import` - Import a dataset document
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use event_tracker::api::{serve, AppState};
//! use event_tracker::config::Config;
//! use event_tracker::store::EventStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let credentials = config.auth.load_credentials()?;
//!     let store = Arc::new(EventStore::open(&config.store, config.event.window())?);
//!
//!     let state = AppState::new(store, config.api, config.event, credentials);
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Largest accepted request body (dataset imports)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Create shared state
    let shared_state = Arc::new(state);

    let api_routes = Router::new()
        // App shell
        .route("/app", get(routes::app::get_navigation))
        // Table routes
        .route("/tables", get(routes::tables::list_tables))
        .route("/tables/:table", get(routes::tables::table_grid))
        .route("/tables/:table/schema", get(routes::tables::table_schema))
        // Record routes
        .route("/stations", post(routes::records::create_stations))
        .route("/foods", post(routes::records::create_foods))
        .route("/orders", post(routes::records::create_orders))
        .route("/staff", post(routes::records::create_staff))
        .route("/rosters", post(routes::records::create_rosters))
        // Report routes
        .route("/reports/popularity", get(routes::reports::popularity))
        .route("/reports/timeline", get(routes::reports::timeline))
        // Dataset routes
        .route("/seed", post(routes::dataset::seed))
        .route("/dataset", delete(routes::dataset::reset_dataset))
        .route("/export", get(routes::dataset::export))
        .route("/import", post(routes::dataset::import_dataset))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            auth::require_api_keys,
        ));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Event Tracker API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Event Tracker API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
