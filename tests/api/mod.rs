//! REST API Tests

mod error_tests;
mod health_tests;
