//! Verification Service
//!
//! The approve/deny state machine over pending KYB submissions. Approval
//! is gated by the registry cross-check; denial requires a reason. The
//! outcome is persisted first, then the event is published fire-and-forget.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Company, CompanyRepository, VerificationAction, VerificationStatus};
use crate::domain::events::{EventPublisher, VerificationEvent};
use crate::domain::registry::RegistryClient;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Verification service trait defining review operations.
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Apply an approve/deny decision to a pending submission.
    async fn transition(
        &self,
        company_id: Uuid,
        request: VerificationRequestDto,
    ) -> Result<VerificationOutcomeDto, VerificationError>;
}

/// A reviewer's decision on a pending submission.
#[derive(Debug, Clone)]
pub struct VerificationRequestDto {
    /// Approve or deny
    pub action: VerificationAction,
    /// Reviewer applying the decision
    pub actor_id: Uuid,
    /// Mandatory for deny, ignored for approve
    pub reason: Option<String>,
}

/// Outcome of an applied decision.
#[derive(Debug, Clone)]
pub struct VerificationOutcomeDto {
    pub company_id: String,
    pub verification_status: String,
    pub is_verified: bool,
    pub tier: Option<String>,
}

impl VerificationOutcomeDto {
    fn from_company(company: &Company) -> Self {
        Self {
            company_id: company.id.to_string(),
            verification_status: company.verification_status.to_string(),
            is_verified: company.is_verified,
            tier: company.tier.clone(),
        }
    }
}

/// Verification service errors.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Company not found")]
    CompanyNotFound,

    #[error("Company is already verified")]
    AlreadyVerified,

    #[error("No KYB submission is awaiting review")]
    NotPending,

    #[error("Company has no registration number on file")]
    RegistrationNumberMissing,

    #[error("A denial reason is required")]
    ReasonRequired,

    #[error("Business with registration number {0} was not found on the registry")]
    NotFoundOnRegistry(String),

    #[error("Registry legal name mismatch: expected '{expected}', registry holds '{found}'")]
    NameMismatch { expected: String, found: String },

    #[error("Registry lookup failed: {0}")]
    RegistryUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Verification service implementation.
pub struct VerificationServiceImpl<C, G, P>
where
    C: CompanyRepository,
    G: RegistryClient,
    P: EventPublisher,
{
    company_repo: Arc<C>,
    registry: Arc<G>,
    publisher: Arc<P>,
}

impl<C, G, P> VerificationServiceImpl<C, G, P>
where
    C: CompanyRepository,
    G: RegistryClient,
    P: EventPublisher,
{
    /// Create a new VerificationServiceImpl.
    pub fn new(company_repo: Arc<C>, registry: Arc<G>, publisher: Arc<P>) -> Self {
        Self {
            company_repo,
            registry,
            publisher,
        }
    }

    /// Publish after the state change committed. A failed publish is
    /// logged and swallowed; the committed state stands.
    async fn publish_post_commit(&self, event: VerificationEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(
                event = event.event_name(),
                error = %e,
                "Failed to publish verification event"
            );
        }
    }

    async fn approve(
        &self,
        company: Company,
        registration_number: String,
        actor_id: Uuid,
    ) -> Result<VerificationOutcomeDto, VerificationError> {
        let record = self
            .registry
            .lookup(&registration_number)
            .await
            .map_err(|e| match e {
                AppError::Upstream(msg) => VerificationError::RegistryUnavailable(msg),
                other => VerificationError::Internal(other.to_string()),
            })?
            .ok_or(VerificationError::NotFoundOnRegistry(registration_number))?;

        // Exact match against the registry record; a mismatch never
        // silently approves.
        if record.legal_name != company.legal_name {
            return Err(VerificationError::NameMismatch {
                expected: company.legal_name,
                found: record.legal_name,
            });
        }

        let updated = self
            .company_repo
            .record_review(
                company.id,
                VerificationStatus::Approved,
                true,
                Some(record.tier),
            )
            .await
            .map_err(|e| VerificationError::Internal(e.to_string()))?;

        tracing::info!(
            company_id = %updated.id,
            tier = updated.tier.as_deref().unwrap_or_default(),
            "Company approved"
        );

        self.publish_post_commit(VerificationEvent::approved(actor_id, &updated))
            .await;

        Ok(VerificationOutcomeDto::from_company(&updated))
    }

    async fn deny(
        &self,
        company: Company,
        actor_id: Uuid,
        reason: Option<String>,
    ) -> Result<VerificationOutcomeDto, VerificationError> {
        // Reason is validated before any state mutation.
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or(VerificationError::ReasonRequired)?;

        let updated = self
            .company_repo
            .record_review(company.id, VerificationStatus::Denied, false, None)
            .await
            .map_err(|e| VerificationError::Internal(e.to_string()))?;

        tracing::info!(company_id = %updated.id, reason = %reason, "Company denied");

        self.publish_post_commit(VerificationEvent::denied(actor_id, &updated, reason))
            .await;

        Ok(VerificationOutcomeDto::from_company(&updated))
    }
}

#[async_trait]
impl<C, G, P> VerificationService for VerificationServiceImpl<C, G, P>
where
    C: CompanyRepository + 'static,
    G: RegistryClient + 'static,
    P: EventPublisher + 'static,
{
    async fn transition(
        &self,
        company_id: Uuid,
        request: VerificationRequestDto,
    ) -> Result<VerificationOutcomeDto, VerificationError> {
        let action = request.action;

        let result = async {
            let company = self
                .company_repo
                .find_by_id(company_id)
                .await
                .map_err(|e| VerificationError::Internal(e.to_string()))?
                .ok_or(VerificationError::CompanyNotFound)?;

            if company.is_verified {
                return Err(VerificationError::AlreadyVerified);
            }

            // Decisions apply only to pending submissions; a denied company
            // re-enters pending through a fresh submission.
            if !company.awaiting_review() {
                return Err(VerificationError::NotPending);
            }

            let registration_number = company
                .registration_number
                .clone()
                .ok_or(VerificationError::RegistrationNumberMissing)?;

            match request.action {
                VerificationAction::Approve => {
                    self.approve(company, registration_number, request.actor_id)
                        .await
                }
                VerificationAction::Deny => {
                    self.deny(company, request.actor_id, request.reason).await
                }
            }
        }
        .await;

        match &result {
            Ok(outcome) => {
                metrics::record_transition(action.as_str(), &outcome.verification_status)
            }
            Err(_) => metrics::record_transition(action.as_str(), "rejected"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MockCompanyRepository;
    use crate::domain::events::MockEventPublisher;
    use crate::domain::registry::{MockRegistryClient, RegistryRecord};

    fn pending_company() -> Company {
        let mut company = Company::new("Acme Ltd", "default");
        company.verification_status = VerificationStatus::Pending;
        company.registration_number = Some("RC123456".to_string());
        company
    }

    fn expect_found(repo: &mut MockCompanyRepository, company: Company) {
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(company.clone())));
    }

    fn silent_publisher() -> MockEventPublisher {
        let mut publisher = MockEventPublisher::new();
        publisher.expect_publish().returning(|_| Ok(()));
        publisher
    }

    fn service(
        company_repo: MockCompanyRepository,
        registry: MockRegistryClient,
        publisher: MockEventPublisher,
    ) -> VerificationServiceImpl<MockCompanyRepository, MockRegistryClient, MockEventPublisher>
    {
        VerificationServiceImpl::new(
            Arc::new(company_repo),
            Arc::new(registry),
            Arc::new(publisher),
        )
    }

    fn approve_request() -> VerificationRequestDto {
        VerificationRequestDto {
            action: VerificationAction::Approve,
            actor_id: Uuid::new_v4(),
            reason: None,
        }
    }

    fn deny_request(reason: Option<&str>) -> VerificationRequestDto {
        VerificationRequestDto {
            action: VerificationAction::Deny,
            actor_id: Uuid::new_v4(),
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_approve_with_matching_registry_record() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);
        company_repo
            .expect_record_review()
            .withf(|_, status, is_verified, tier| {
                *status == VerificationStatus::Approved
                    && *is_verified
                    && tier.as_deref() == Some("tier_2")
            })
            .returning(|id, status, is_verified, tier| {
                let mut updated = pending_company();
                updated.id = id;
                updated.verification_status = status;
                updated.is_verified = is_verified;
                updated.tier = tier;
                Ok(updated)
            });

        let mut registry = MockRegistryClient::new();
        registry.expect_lookup().returning(|_| {
            Ok(Some(RegistryRecord {
                legal_name: "Acme Ltd".to_string(),
                tier: "tier_2".to_string(),
            }))
        });

        let mut publisher = MockEventPublisher::new();
        publisher
            .expect_publish()
            .withf(|event| matches!(event, VerificationEvent::Approved(_)))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(company_repo, registry, publisher);
        let outcome = service
            .transition(company_id, approve_request())
            .await
            .unwrap();

        assert!(outcome.is_verified);
        assert_eq!(outcome.verification_status, "approved");
        assert_eq!(outcome.tier.as_deref(), Some("tier_2"));
    }

    #[tokio::test]
    async fn test_approve_fails_when_registry_has_no_record() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let mut registry = MockRegistryClient::new();
        registry.expect_lookup().returning(|_| Ok(None));

        // record_review and publish must never run on a failed cross-check.
        let service = service(company_repo, registry, MockEventPublisher::new());
        let result = service.transition(company_id, approve_request()).await;

        match result {
            Err(VerificationError::NotFoundOnRegistry(number)) => {
                assert_eq!(number, "RC123456")
            }
            other => panic!("Expected NotFoundOnRegistry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_approve_fails_on_legal_name_mismatch() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let mut registry = MockRegistryClient::new();
        registry.expect_lookup().returning(|_| {
            Ok(Some(RegistryRecord {
                legal_name: "Acme Limited".to_string(),
                tier: "tier_1".to_string(),
            }))
        });

        let service = service(company_repo, registry, MockEventPublisher::new());
        let result = service.transition(company_id, approve_request()).await;

        match result {
            Err(VerificationError::NameMismatch { expected, found }) => {
                assert_eq!(expected, "Acme Ltd");
                assert_eq!(found, "Acme Limited");
            }
            other => panic!("Expected NameMismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transition_requires_registration_number() {
        let mut company = pending_company();
        company.registration_number = None;
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        // The registry must never be consulted without a number on file.
        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );
        let result = service.transition(company_id, approve_request()).await;

        assert!(matches!(
            result,
            Err(VerificationError::RegistrationNumberMissing)
        ));
    }

    #[tokio::test]
    async fn test_deny_without_reason_never_mutates_state() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );

        for reason in [None, Some(""), Some("   ")] {
            let result = service
                .transition(company_id, deny_request(reason))
                .await;
            assert!(matches!(result, Err(VerificationError::ReasonRequired)));
        }
    }

    #[tokio::test]
    async fn test_deny_publishes_event_carrying_reason() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);
        company_repo
            .expect_record_review()
            .withf(|_, status, is_verified, tier| {
                *status == VerificationStatus::Denied && !is_verified && tier.is_none()
            })
            .returning(|id, status, _, _| {
                let mut updated = pending_company();
                updated.id = id;
                updated.verification_status = status;
                Ok(updated)
            });

        let mut publisher = MockEventPublisher::new();
        publisher
            .expect_publish()
            .withf(|event| match event {
                VerificationEvent::Denied(payload) => payload.reason == "incomplete documents",
                _ => false,
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(company_repo, MockRegistryClient::new(), publisher);
        let outcome = service
            .transition(company_id, deny_request(Some("incomplete documents")))
            .await
            .unwrap();

        assert_eq!(outcome.verification_status, "denied");
        assert!(!outcome.is_verified);
    }

    #[tokio::test]
    async fn test_failed_publish_keeps_committed_state() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);
        company_repo
            .expect_record_review()
            .returning(|id, status, _, _| {
                let mut updated = pending_company();
                updated.id = id;
                updated.verification_status = status;
                Ok(updated)
            });

        let mut publisher = MockEventPublisher::new();
        publisher
            .expect_publish()
            .returning(|_| Err(AppError::Internal("bus offline".to_string())));

        let service = service(company_repo, MockRegistryClient::new(), publisher);
        let outcome = service
            .transition(company_id, deny_request(Some("incomplete documents")))
            .await
            .unwrap();

        assert_eq!(outcome.verification_status, "denied");
    }

    #[tokio::test]
    async fn test_unsubmitted_company_is_not_reviewable() {
        let mut company = pending_company();
        company.verification_status = VerificationStatus::Unsubmitted;
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );
        let result = service.transition(company_id, approve_request()).await;

        assert!(matches!(result, Err(VerificationError::NotPending)));
    }

    #[tokio::test]
    async fn test_denied_company_cannot_be_approved_directly() {
        let mut company = pending_company();
        company.verification_status = VerificationStatus::Denied;
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );
        let result = service.transition(company_id, approve_request()).await;

        assert!(matches!(result, Err(VerificationError::NotPending)));
    }

    #[tokio::test]
    async fn test_verified_company_reports_already_verified() {
        let mut company = pending_company();
        company.is_verified = true;
        company.verification_status = VerificationStatus::Approved;
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );
        let result = service.transition(company_id, approve_request()).await;

        assert!(matches!(result, Err(VerificationError::AlreadyVerified)));
    }

    #[tokio::test]
    async fn test_missing_company_is_not_found() {
        let mut company_repo = MockCompanyRepository::new();
        company_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(
            company_repo,
            MockRegistryClient::new(),
            MockEventPublisher::new(),
        );
        let result = service
            .transition(Uuid::new_v4(), approve_request())
            .await;

        assert!(matches!(result, Err(VerificationError::CompanyNotFound)));
    }

    #[tokio::test]
    async fn test_registry_outage_surfaces_as_unavailable() {
        let company = pending_company();
        let company_id = company.id;

        let mut company_repo = MockCompanyRepository::new();
        expect_found(&mut company_repo, company);

        let mut registry = MockRegistryClient::new();
        registry
            .expect_lookup()
            .returning(|_| Err(AppError::Upstream("connection refused".to_string())));

        let service = service(company_repo, registry, silent_publisher());
        let result = service.transition(company_id, approve_request()).await;

        assert!(matches!(
            result,
            Err(VerificationError::RegistryUnavailable(_))
        ));
    }
}
