//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create company request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 2, max = 255, message = "Legal name must be 2-255 characters"))]
    pub legal_name: String,

    #[validate(length(min = 1, max = 64, message = "Company type must be 1-64 characters"))]
    pub company_type: Option<String>,
}

/// Verification decision request
#[derive(Debug, Deserialize, Validate)]
pub struct VerificationRequest {
    /// "approve" or "deny"
    pub action: String,

    /// Reviewer applying the decision
    pub actor_id: Uuid,

    /// Mandatory for deny
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}
