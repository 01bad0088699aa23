//! # Sporetrack HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /stages` - The fixed stage order
//! - `POST /workflow` - Six stage summaries for a batch
//! - `POST /workflow/edit` - Gate an edit request for one stage
//! - `POST /analytics/yield` - Yield totals over a batch list
//! - `POST /analytics/distribution` - Batches per stage
//! - `POST /analytics/break-even` - Break-even volume for a cost structure
//!
//! Batch records arrive in request bodies; the server holds no batch state.

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    break_even_handler, distribution_handler, edit_handler, health_handler, stages_handler,
    workflow_handler, yield_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    BreakEvenRequest, BreakEvenResponse, EditRequest, EditResponse, ErrorResponse,
    HealthResponse, StageInfo, StageSummaryJson, StagesResponse, WorkflowResponse,
};

use crate::config::Config;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use sporetrack_core::SporetrackError;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (2 MB).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new app state from the effective configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Dashboard dev servers allowed when `cors_origins` is unset.
const DASHBOARD_DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// CORS for the farm dashboard. `"*"` opens the API to any origin.
fn build_cors_layer(cors_origins: Option<&str>) -> CorsLayer {
    if cors_origins == Some("*") {
        tracing::warn!("CORS open to all origins");
        return CorsLayer::permissive();
    }

    let configured: Vec<&str> = cors_origins
        .map(|list| list.split(',').map(str::trim).filter(|o| !o.is_empty()).collect())
        .unwrap_or_default();
    let mut origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS limited to dashboard dev servers");
        origins = DASHBOARD_DEV_ORIGINS
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router.
///
/// Layers, outermost first: request tracing, CORS, body limit, then the
/// rate limiter when `server.rate_limit` is non-zero.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.server.cors_origins.as_deref());

    let rate_limit = state.config.server.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    if state.config.render.strict_stages {
        tracing::info!("Strict stage mode: unrecognized currentStage values are rejected");
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stages", get(handlers::stages_handler))
        .route("/workflow", post(handlers::workflow_handler))
        .route("/workflow/edit", post(handlers::edit_handler))
        .route("/analytics/yield", post(handlers::yield_handler))
        .route("/analytics/distribution", post(handlers::distribution_handler))
        .route("/analytics/break-even", post(handlers::break_even_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: Config) -> Result<(), SporetrackError> {
    let addr = config.bind_address();
    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SporetrackError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Sporetrack HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SporetrackError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
