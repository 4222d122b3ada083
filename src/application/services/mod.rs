//! Application Services
//!
//! Business logic orchestration over the domain ports.

pub mod company_service;
pub mod onboarding_service;
pub mod verification_service;

pub use company_service::{CompanyError, CompanyService, CompanyServiceImpl, CreateCompanyDto};
pub use onboarding_service::{
    KybSubmissionDto, OnboardingError, OnboardingService, OnboardingServiceImpl, SubmissionAckDto,
    UploadedFileDto,
};
pub use verification_service::{
    VerificationError, VerificationOutcomeDto, VerificationRequestDto, VerificationService,
    VerificationServiceImpl,
};
