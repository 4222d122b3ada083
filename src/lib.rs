//! # Company Service Library
//!
//! This crate provides a company onboarding service with:
//! - Settings-driven KYB submission validation
//! - Merge-and-persist handling of partial submissions
//! - An approve/deny verification state machine with registry cross-checks
//! - Verification events published on Redis pub/sub
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities, value objects, and ports
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, registry, and event bus implementations
//! - **Presentation Layer**: HTTP handlers and routes
//!
//! ## Module Structure
//!
//! ```text
//! company_service/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities, value objects, and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database, registry, and event bus implementations
//! +-- presentation/  HTTP routes and handlers
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
