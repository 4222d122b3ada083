//! Company entity and repository trait.
//!
//! Maps to the `companies` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::KybData;
use crate::shared::error::AppError;

/// KYB verification lifecycle status matching the database VARCHAR constraint.
///
/// Transitions: `unsubmitted -> pending -> {approved, denied}`, with
/// `denied -> pending` re-entered through a fresh submission. There is no
/// direct `denied -> approved` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Unsubmitted,
    Pending,
    Approved,
    Denied,
}

impl VerificationStatus {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "denied" => Self::Denied,
            _ => Self::Unsubmitted,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsubmitted => "unsubmitted",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Whether a reviewer may act on this status (approve or deny).
    pub fn is_reviewable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reviewer action on a pending KYB submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationAction {
    Approve,
    Deny,
}

impl VerificationAction {
    /// Parse a caller-supplied action name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }

    /// Action name for logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
        }
    }
}

/// Represents a business being onboarded.
///
/// Maps to the `companies` table:
/// - id: UUID PRIMARY KEY
/// - legal_name: VARCHAR(255) NOT NULL
/// - company_type: VARCHAR(64) NOT NULL (selects the requirement schema)
/// - registration_number: VARCHAR(64) NULL, unique once set
/// - is_verified: BOOLEAN NOT NULL DEFAULT FALSE
/// - verification_status: VARCHAR(20) DEFAULT 'unsubmitted'
/// - kyb_data: JSONB NOT NULL DEFAULT '{}'
/// - tier: VARCHAR(32) NULL (assigned on approval from the registry)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Primary key, assigned at creation
    pub id: Uuid,

    /// Registered legal name, compared against the registry on approval
    pub legal_name: String,

    /// Company type selecting the active requirement schema
    pub company_type: String,

    /// Business-registry number, None until submitted
    pub registration_number: Option<String>,

    /// One-way flag, set to true only by an approved verification
    pub is_verified: bool,

    /// Current verification lifecycle status
    #[serde(default)]
    pub verification_status: VerificationStatus,

    /// Merged KYB submission fields
    #[serde(default)]
    pub kyb_data: KybData,

    /// Tier classification assigned on approval
    pub tier: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a fresh, unverified company.
    pub fn new(legal_name: impl Into<String>, company_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            legal_name: legal_name.into(),
            company_type: company_type.into(),
            registration_number: None,
            is_verified: false,
            verification_status: VerificationStatus::default(),
            kyb_data: KybData::new(),
            tier: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether new KYB submissions are accepted.
    ///
    /// Verification is terminal: once verified, submissions and field
    /// updates fail fast.
    pub fn accepts_submissions(&self) -> bool {
        !self.is_verified
    }

    /// Whether a submission is awaiting review.
    pub fn awaiting_review(&self) -> bool {
        self.verification_status.is_reviewable()
    }
}

impl Default for Company {
    fn default() -> Self {
        Self::new(String::new(), "default")
    }
}

/// Repository trait for Company data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Find a company by its ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError>;

    /// Find a company by its registration number.
    async fn find_by_registration_number(
        &self,
        registration_number: &str,
    ) -> Result<Option<Company>, AppError>;

    /// Count companies holding the given registration number.
    async fn count_by_registration_number(
        &self,
        registration_number: &str,
    ) -> Result<i64, AppError>;

    /// Create a new company.
    async fn create(&self, company: &Company) -> Result<Company, AppError>;

    /// Persist a merged KYB submission atomically.
    ///
    /// Writes the merged field map, the registration number when supplied,
    /// and the new lifecycle status in a single statement. A storage-level
    /// unique violation on the registration number surfaces as
    /// `AppError::Conflict`.
    async fn apply_submission(
        &self,
        id: Uuid,
        kyb_data: KybData,
        registration_number: Option<String>,
        status: VerificationStatus,
    ) -> Result<Company, AppError>;

    /// Persist the outcome of a verification review.
    async fn record_review(
        &self,
        id: Uuid,
        status: VerificationStatus,
        is_verified: bool,
        tier: Option<String>,
    ) -> Result<Company, AppError>;
}
