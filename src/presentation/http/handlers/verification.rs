//! Verification Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::request::VerificationRequest;
use crate::application::dto::response::VerificationResponse;
use crate::application::services::{
    VerificationError, VerificationRequestDto, VerificationService, VerificationServiceImpl,
};
use crate::domain::entities::VerificationAction;
use crate::infrastructure::repositories::PgCompanyRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn map_verification_error(err: VerificationError) -> AppError {
    match err {
        VerificationError::CompanyNotFound => AppError::NotFound("Company not found".into()),
        VerificationError::AlreadyVerified | VerificationError::NotPending => {
            AppError::Conflict(err.to_string())
        }
        VerificationError::ReasonRequired => AppError::Validation(err.to_string()),
        VerificationError::RegistrationNumberMissing
        | VerificationError::NotFoundOnRegistry(_)
        | VerificationError::NameMismatch { .. } => AppError::PreconditionFailed(err.to_string()),
        VerificationError::RegistryUnavailable(msg) => AppError::Upstream(msg),
        VerificationError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Approve or deny a pending KYB submission
pub async fn transition_verification(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(body): Json<VerificationRequest>,
) -> Result<Json<VerificationResponse>, AppError> {
    // Validate request
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let action = VerificationAction::parse(&body.action).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown verification action '{}'", body.action))
    })?;

    let company_repo = Arc::new(PgCompanyRepository::new(state.db.clone()));
    let verification_service = VerificationServiceImpl::new(
        company_repo,
        state.registry.clone(),
        state.publisher.clone(),
    );

    let outcome = verification_service
        .transition(
            company_id,
            VerificationRequestDto {
                action,
                actor_id: body.actor_id,
                reason: body.reason,
            },
        )
        .await
        .map_err(map_verification_error)?;

    Ok(Json(VerificationResponse::from(outcome)))
}
