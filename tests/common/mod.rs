//! Common Test Utilities
//!
//! Shared helpers for driving routers without a running server.

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

/// Test application wrapping a router under test
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    /// Wrap a router built by the test.
    ///
    /// Stateful routes need a database and Redis behind them; tests here
    /// exercise the stateless surface.
    pub fn with_router(router: Router) -> Self {
        Self { router }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body as JSON
pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
