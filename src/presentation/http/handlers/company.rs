//! Company Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::request::CreateCompanyRequest;
use crate::application::dto::response::CompanyResponse;
use crate::application::services::{
    CompanyError, CompanyService, CompanyServiceImpl, CreateCompanyDto,
};
use crate::infrastructure::repositories::PgCompanyRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn map_company_error(err: CompanyError) -> AppError {
    match err {
        CompanyError::NotFound => AppError::NotFound("Company not found".into()),
        CompanyError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Create a company
pub async fn create_company(
    State(state): State<AppState>,
    Json(body): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    // Validate request
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let company_repo = Arc::new(PgCompanyRepository::new(state.db.clone()));
    let company_service = CompanyServiceImpl::new(company_repo);

    let company = company_service
        .create_company(CreateCompanyDto {
            legal_name: body.legal_name,
            company_type: body.company_type.unwrap_or_else(|| "default".to_string()),
        })
        .await
        .map_err(map_company_error)?;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from_company(company))))
}

/// Get a company by ID
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company_repo = Arc::new(PgCompanyRepository::new(state.db.clone()));
    let company_service = CompanyServiceImpl::new(company_repo);

    let company = company_service
        .get_company(company_id)
        .await
        .map_err(map_company_error)?;

    Ok(Json(CompanyResponse::from_company(company)))
}
