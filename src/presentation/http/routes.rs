//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Slack on top of the upload ceiling for multipart framing and text parts.
const BODY_LIMIT_SLACK_BYTES: usize = 64 * 1024;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(&state))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new().nest("/companies", company_routes(state))
}

/// Company onboarding and verification routes
fn company_routes(state: &AppState) -> Router<AppState> {
    let submission_body_limit =
        state.settings.kyb.max_file_bytes as usize + BODY_LIMIT_SLACK_BYTES;

    Router::new()
        .route("/", post(handlers::company::create_company))
        .route("/{company_id}", get(handlers::company::get_company))
        .route(
            "/{company_id}/kyb",
            post(handlers::kyb::submit_kyb)
                .layer(DefaultBodyLimit::max(submission_body_limit)),
        )
        .route(
            "/{company_id}/verification",
            post(handlers::verification::transition_verification),
        )
}
