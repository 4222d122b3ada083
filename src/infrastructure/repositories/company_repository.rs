//! Company Repository Implementation
//!
//! PostgreSQL implementation of company data access. The merged KYB field
//! map lives in a JSONB column; the registration-number uniqueness
//! invariant is enforced by a partial unique index, and violations are
//! mapped to a conflict error here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Company, CompanyRepository, VerificationStatus};
use crate::domain::value_objects::KybData;
use crate::shared::error::AppError;

const COMPANY_COLUMNS: &str = "id, legal_name, company_type, registration_number, is_verified, \
     verification_status, kyb_data, tier, created_at, updated_at";

/// Database row for a company.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    legal_name: String,
    company_type: String,
    registration_number: Option<String>,
    is_verified: bool,
    verification_status: String,
    kyb_data: serde_json::Value,
    tier: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    /// Convert to the domain entity, deserializing the JSONB field map.
    fn into_company(self) -> Result<Company, AppError> {
        let kyb_data: KybData = serde_json::from_value(self.kyb_data).map_err(|e| {
            AppError::Internal(format!("Corrupt kyb_data for company {}: {}", self.id, e))
        })?;

        Ok(Company {
            id: self.id,
            legal_name: self.legal_name,
            company_type: self.company_type,
            registration_number: self.registration_number,
            is_verified: self.is_verified,
            verification_status: VerificationStatus::from_str(&self.verification_status),
            kyb_data,
            tier: self.tier,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Map a write failure to the conflict error when it tripped the
/// registration-number unique index.
fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.constraint() == Some("companies_registration_number_key") {
            return AppError::Conflict("Registration number is already in use".to_string());
        }
    }
    AppError::Database(err)
}

/// PostgreSQL implementation of the CompanyRepository.
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    /// Creates a new PgCompanyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    /// Find a company by its ID.
    ///
    /// Returns None if the company does not exist.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CompanyRow::into_company).transpose()
    }

    /// Find a company by its registration number.
    async fn find_by_registration_number(
        &self,
        registration_number: &str,
    ) -> Result<Option<Company>, AppError> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE registration_number = $1",
            COMPANY_COLUMNS
        ))
        .bind(registration_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CompanyRow::into_company).transpose()
    }

    /// Count companies holding the given registration number.
    ///
    /// Used as the pre-write uniqueness check; the unique index remains
    /// the authoritative enforcement.
    async fn count_by_registration_number(
        &self,
        registration_number: &str,
    ) -> Result<i64, AppError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM companies WHERE registration_number = $1")
                .bind(registration_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Create a new company.
    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        let kyb_data = serde_json::to_value(&company.kyb_data)
            .map_err(|e| AppError::Internal(format!("Failed to encode kyb_data: {}", e)))?;

        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            INSERT INTO companies (id, legal_name, company_type, registration_number,
                                   is_verified, verification_status, kyb_data, tier)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(company.id)
        .bind(&company.legal_name)
        .bind(&company.company_type)
        .bind(&company.registration_number)
        .bind(company.is_verified)
        .bind(company.verification_status.as_str())
        .bind(kyb_data)
        .bind(&company.tier)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.into_company()
    }

    /// Persist a merged KYB submission atomically.
    ///
    /// A single UPDATE carries the merged field map, the registration
    /// number when supplied, and the new lifecycle status.
    async fn apply_submission(
        &self,
        id: Uuid,
        kyb_data: KybData,
        registration_number: Option<String>,
        status: VerificationStatus,
    ) -> Result<Company, AppError> {
        let kyb_data = serde_json::to_value(&kyb_data)
            .map_err(|e| AppError::Internal(format!("Failed to encode kyb_data: {}", e)))?;

        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            UPDATE companies
            SET kyb_data = $2,
                registration_number = COALESCE($3, registration_number),
                verification_status = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(id)
        .bind(kyb_data)
        .bind(registration_number)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        let row = row.ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;
        row.into_company()
    }

    /// Persist the outcome of a verification review.
    async fn record_review(
        &self,
        id: Uuid,
        status: VerificationStatus,
        is_verified: bool,
        tier: Option<String>,
    ) -> Result<Company, AppError> {
        // is_verified is a one-way flag: OR keeps an already-verified row
        // verified no matter what the caller passes.
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            UPDATE companies
            SET verification_status = $2,
                is_verified = is_verified OR $3,
                tier = COALESCE($4, tier),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(is_verified)
        .bind(tier)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;
        row.into_company()
    }
}
