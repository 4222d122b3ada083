//! KYB Submission Handler
//!
//! Accepts a multipart submission: text parts are dynamic requirement
//! fields, binary parts are uploaded documents keyed by their field name,
//! and the reserved `registration_number` part updates that attribute.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::application::dto::response::SubmissionResponse;
use crate::application::services::{
    KybSubmissionDto, OnboardingError, OnboardingService, OnboardingServiceImpl, UploadedFileDto,
};
use crate::domain::services::FileSizePolicy;
use crate::infrastructure::repositories::{PgCompanyRepository, PgRequirementRepository};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Reserved multipart part name carrying the registration number.
const REGISTRATION_NUMBER_FIELD: &str = "registration_number";

fn map_onboarding_error(err: OnboardingError) -> AppError {
    match err {
        OnboardingError::CompanyNotFound => AppError::NotFound("Company not found".into()),
        OnboardingError::AlreadyVerified
        | OnboardingError::DuplicateRegistrationNumber => AppError::Conflict(err.to_string()),
        OnboardingError::SchemaUnavailable => AppError::PreconditionFailed(err.to_string()),
        OnboardingError::FieldTooLong { .. }
        | OnboardingError::UnsupportedFieldType { .. }
        | OnboardingError::FileTooLarge { .. } => AppError::Validation(err.to_string()),
        OnboardingError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Parse the multipart payload into a submission DTO.
async fn read_submission(multipart: &mut Multipart) -> Result<KybSubmissionDto, AppError> {
    let mut submission = KybSubmissionDto::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

            submission.files.push(UploadedFileDto {
                field: name,
                file_name,
                data: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;

            if name == REGISTRATION_NUMBER_FIELD {
                submission.registration_number = Some(value).filter(|v| !v.is_empty());
            } else {
                submission.fields.insert(name, value);
            }
        }
    }

    Ok(submission)
}

/// Submit KYB fields and documents for a company
pub async fn submit_kyb(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = read_submission(&mut multipart).await?;

    let company_repo = Arc::new(PgCompanyRepository::new(state.db.clone()));
    let requirement_repo = Arc::new(PgRequirementRepository::new(state.db.clone()));
    let onboarding_service = OnboardingServiceImpl::new(
        company_repo,
        requirement_repo,
        FileSizePolicy::new(state.settings.kyb.max_file_bytes),
    );

    let ack = onboarding_service
        .submit_kyb(company_id, submission)
        .await
        .map_err(map_onboarding_error)?;

    Ok(Json(SubmissionResponse::from(ack)))
}
