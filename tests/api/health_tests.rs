//! Health Check API Tests

use axum::http::StatusCode;
use axum::{routing::get, Router};

use company_service::presentation::http::handlers::health;

use crate::common::{read_json, TestApp};

fn health_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
}

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::with_router(health_router());

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test health check returns JSON with status field
#[tokio::test]
async fn test_health_check_returns_json() {
    let app = TestApp::with_router(health_router());

    let response = app.get("/health").await;
    let json = read_json(response).await;

    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
}

/// Test liveness probe endpoint
#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::with_router(health_router());

    let response = app.get("/health/live").await;
    let json = read_json(response).await;

    assert_eq!(json["status"], "alive");
}
