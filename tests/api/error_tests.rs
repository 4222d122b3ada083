//! Error Response Tests
//!
//! Verifies the HTTP mapping of the error taxonomy surfaced to callers.

use axum::http::StatusCode;
use axum::{routing::get, Json, Router};

use company_service::shared::error::AppError;

use crate::common::{read_json, TestApp};

fn failing_router() -> Router {
    Router::new()
        .route(
            "/not-found",
            get(|| async { Err::<Json<()>, _>(AppError::NotFound("Company not found".into())) }),
        )
        .route(
            "/conflict",
            get(|| async {
                Err::<Json<()>, _>(AppError::Conflict(
                    "Registration number is already in use".into(),
                ))
            }),
        )
        .route(
            "/precondition",
            get(|| async {
                Err::<Json<()>, _>(AppError::PreconditionFailed(
                    "Company has no registration number on file".into(),
                ))
            }),
        )
        .route(
            "/validation",
            get(|| async {
                Err::<Json<()>, _>(AppError::Validation(
                    "Field 'tax_id' exceeds the maximum length of 15 characters".into(),
                ))
            }),
        )
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let app = TestApp::with_router(failing_router());

    let response = app.get("/not-found").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = read_json(response).await;
    assert_eq!(json["message"], "Company not found");
}

#[tokio::test]
async fn test_conflict_maps_to_409() {
    let app = TestApp::with_router(failing_router());

    let response = app.get("/conflict").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_precondition_maps_to_422() {
    let app = TestApp::with_router(failing_router());

    let response = app.get("/precondition").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_validation_maps_to_400_with_message() {
    let app = TestApp::with_router(failing_router());

    let response = app.get("/validation").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = read_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("tax_id"));
}
