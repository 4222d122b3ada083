//! Company Service
//!
//! Creation and lookup of companies. Creation happens at signup time;
//! the authenticated signup flow itself lives outside this service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Company, CompanyRepository};

/// Company service trait defining entity operations.
#[async_trait]
pub trait CompanyService: Send + Sync {
    /// Create a fresh, unverified company.
    async fn create_company(&self, request: CreateCompanyDto) -> Result<Company, CompanyError>;

    /// Fetch a company by ID.
    async fn get_company(&self, company_id: Uuid) -> Result<Company, CompanyError>;
}

/// Request DTO for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyDto {
    /// Registered legal name
    pub legal_name: String,
    /// Company type selecting the requirement schema (defaults upstream)
    pub company_type: String,
}

/// Company service errors.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    #[error("Company not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Company service implementation.
pub struct CompanyServiceImpl<C>
where
    C: CompanyRepository,
{
    company_repo: Arc<C>,
}

impl<C> CompanyServiceImpl<C>
where
    C: CompanyRepository,
{
    /// Create a new CompanyServiceImpl.
    pub fn new(company_repo: Arc<C>) -> Self {
        Self { company_repo }
    }
}

#[async_trait]
impl<C> CompanyService for CompanyServiceImpl<C>
where
    C: CompanyRepository + 'static,
{
    async fn create_company(&self, request: CreateCompanyDto) -> Result<Company, CompanyError> {
        let company = Company::new(request.legal_name, request.company_type);

        let created = self
            .company_repo
            .create(&company)
            .await
            .map_err(|e| CompanyError::Internal(e.to_string()))?;

        tracing::info!(company_id = %created.id, "Company created");

        Ok(created)
    }

    async fn get_company(&self, company_id: Uuid) -> Result<Company, CompanyError> {
        self.company_repo
            .find_by_id(company_id)
            .await
            .map_err(|e| CompanyError::Internal(e.to_string()))?
            .ok_or(CompanyError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MockCompanyRepository;

    #[tokio::test]
    async fn test_create_company_starts_unverified() {
        let mut company_repo = MockCompanyRepository::new();
        company_repo
            .expect_create()
            .withf(|company| !company.is_verified && company.kyb_data.is_empty())
            .returning(|company| Ok(company.clone()));

        let service = CompanyServiceImpl::new(Arc::new(company_repo));
        let created = service
            .create_company(CreateCompanyDto {
                legal_name: "Acme Ltd".to_string(),
                company_type: "default".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.legal_name, "Acme Ltd");
        assert!(!created.is_verified);
    }

    #[tokio::test]
    async fn test_get_missing_company_is_not_found() {
        let mut company_repo = MockCompanyRepository::new();
        company_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = CompanyServiceImpl::new(Arc::new(company_repo));
        let result = service.get_company(Uuid::new_v4()).await;

        assert!(matches!(result, Err(CompanyError::NotFound)));
    }
}
