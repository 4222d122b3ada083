//! Onboarding Service
//!
//! Handles KYB submissions: schema-driven validation, the upload size
//! check, the registration-number uniqueness guard, and the merge-and-
//! persist step. Validation is all-or-nothing per submission; a rejected
//! submission never partially merges.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{CompanyRepository, RequirementRepository, VerificationStatus};
use crate::domain::services::{
    validate_file_fields, validate_text_fields, FileSizePolicy, RequirementViolation,
};
use crate::domain::value_objects::FileDescriptor;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Onboarding service trait defining KYB submission operations.
#[async_trait]
pub trait OnboardingService: Send + Sync {
    /// Validate, merge, and persist a KYB submission for a company.
    async fn submit_kyb(
        &self,
        company_id: Uuid,
        submission: KybSubmissionDto,
    ) -> Result<SubmissionAckDto, OnboardingError>;
}

/// An uploaded file, keyed by its declared requirement field.
#[derive(Debug, Clone)]
pub struct UploadedFileDto {
    /// Requirement field name this upload answers
    pub field: String,
    /// Original file name
    pub file_name: String,
    /// Raw file contents
    pub data: Vec<u8>,
}

/// Incoming KYB submission. Partial submissions are expected; only the
/// keys present are merged.
#[derive(Debug, Clone, Default)]
pub struct KybSubmissionDto {
    /// Registration number, persisted alongside the field map when present
    pub registration_number: Option<String>,
    /// Dynamic text fields keyed by requirement name
    pub fields: BTreeMap<String, String>,
    /// Uploaded files keyed by requirement name
    pub files: Vec<UploadedFileDto>,
}

/// Acknowledgement returned for an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionAckDto {
    /// Company the submission was merged into
    pub company_id: String,
    /// Lifecycle status after the merge (always pending)
    pub verification_status: String,
    /// Field names accepted from this submission, in key order
    pub accepted_fields: Vec<String>,
    /// Total fields stored on the company after the merge
    pub stored_field_count: usize,
}

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

/// Onboarding service errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Company not found")]
    CompanyNotFound,

    #[error("Company is already verified")]
    AlreadyVerified,

    #[error("No KYB requirement schema is configured for this company type")]
    SchemaUnavailable,

    #[error("Field '{field}' exceeds the maximum length of {limit} characters")]
    FieldTooLong { field: String, limit: i32 },

    #[error("Field '{field}' does not accept the submitted value type")]
    UnsupportedFieldType { field: String },

    #[error("Uploaded files exceed the maximum allowed size of {:.1} MB", megabytes(.max_allowed))]
    FileTooLarge { max_allowed: u64 },

    #[error("Registration number is already in use by another business")]
    DuplicateRegistrationNumber,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RequirementViolation> for OnboardingError {
    fn from(violation: RequirementViolation) -> Self {
        match violation {
            RequirementViolation::FieldTooLong { field, limit } => {
                Self::FieldTooLong { field, limit }
            }
            RequirementViolation::KindMismatch { field, .. } => {
                Self::UnsupportedFieldType { field }
            }
        }
    }
}

/// Onboarding service implementation.
pub struct OnboardingServiceImpl<C, R>
where
    C: CompanyRepository,
    R: RequirementRepository,
{
    company_repo: Arc<C>,
    requirement_repo: Arc<R>,
    file_policy: FileSizePolicy,
}

impl<C, R> OnboardingServiceImpl<C, R>
where
    C: CompanyRepository,
    R: RequirementRepository,
{
    /// Create a new OnboardingServiceImpl.
    pub fn new(company_repo: Arc<C>, requirement_repo: Arc<R>, file_policy: FileSizePolicy) -> Self {
        Self {
            company_repo,
            requirement_repo,
            file_policy,
        }
    }

    async fn process_submission(
        &self,
        company_id: Uuid,
        submission: KybSubmissionDto,
    ) -> Result<SubmissionAckDto, OnboardingError> {
        let company = self
            .company_repo
            .find_by_id(company_id)
            .await
            .map_err(|e| OnboardingError::Internal(e.to_string()))?
            .ok_or(OnboardingError::CompanyNotFound)?;

        // Verification is terminal: no further submissions once verified.
        if !company.accepts_submissions() {
            return Err(OnboardingError::AlreadyVerified);
        }

        let schema = self
            .requirement_repo
            .active_schema(&company.company_type)
            .await
            .map_err(|e| OnboardingError::Internal(e.to_string()))?;

        if schema.is_empty() {
            return Err(OnboardingError::SchemaUnavailable);
        }

        // Validate against the schema. Undeclared fields are dropped, not
        // rejected; declared fields must match their kind and length.
        let accepted_texts = validate_text_fields(&schema, &submission.fields)?;
        let accepted_names = validate_file_fields(
            &schema,
            submission.files.iter().map(|f| f.field.as_str()),
        )?;

        // Aggregate upload size check, skipped entirely for file-less
        // submissions.
        if !submission.files.is_empty() {
            let sizes: Vec<u64> = submission
                .files
                .iter()
                .map(|f| f.data.len() as u64)
                .collect();
            let check = self.file_policy.check(&sizes);
            if !check.valid {
                return Err(OnboardingError::FileTooLarge {
                    max_allowed: check.max_allowed,
                });
            }
        }

        // Uniqueness guard: any company holding the number blocks the
        // submission. The unique index stays authoritative; this count is
        // the friendlier pre-check.
        if let Some(registration_number) = submission.registration_number.as_deref() {
            let count = self
                .company_repo
                .count_by_registration_number(registration_number)
                .await
                .map_err(|e| OnboardingError::Internal(e.to_string()))?;

            if count > 0 {
                return Err(OnboardingError::DuplicateRegistrationNumber);
            }
        }

        let mut file_fields = BTreeMap::new();
        for upload in submission.files {
            if accepted_names.contains(&upload.field) {
                file_fields.insert(
                    upload.field,
                    FileDescriptor::new(upload.file_name, upload.data),
                );
            }
        }

        let mut accepted_fields: Vec<String> = accepted_texts.keys().cloned().collect();
        accepted_fields.extend(file_fields.keys().cloned());
        accepted_fields.sort();

        // Merge on top of the stored map and persist in one statement,
        // re-entering pending from unsubmitted or denied.
        let merged = company.kyb_data.merged_with(&accepted_texts, &file_fields);

        let updated = self
            .company_repo
            .apply_submission(
                company_id,
                merged,
                submission.registration_number,
                VerificationStatus::Pending,
            )
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => OnboardingError::DuplicateRegistrationNumber,
                other => OnboardingError::Internal(other.to_string()),
            })?;

        tracing::info!(
            company_id = %updated.id,
            accepted = accepted_fields.len(),
            stored = updated.kyb_data.len(),
            "KYB submission merged"
        );

        Ok(SubmissionAckDto {
            company_id: updated.id.to_string(),
            verification_status: updated.verification_status.to_string(),
            accepted_fields,
            stored_field_count: updated.kyb_data.len(),
        })
    }
}

#[async_trait]
impl<C, R> OnboardingService for OnboardingServiceImpl<C, R>
where
    C: CompanyRepository + 'static,
    R: RequirementRepository + 'static,
{
    async fn submit_kyb(
        &self,
        company_id: Uuid,
        submission: KybSubmissionDto,
    ) -> Result<SubmissionAckDto, OnboardingError> {
        let result = self.process_submission(company_id, submission).await;

        match &result {
            Ok(_) => metrics::record_submission("accepted"),
            Err(_) => metrics::record_submission("rejected"),
        }

        result
    }
}
