//! Repository Implementations
//!
//! PostgreSQL-backed implementations of the domain repository traits.

pub mod company_repository;
pub mod requirement_repository;

pub use company_repository::PgCompanyRepository;
pub use requirement_repository::PgRequirementRepository;
