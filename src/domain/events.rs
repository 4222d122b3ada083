//! Verification Domain Events
//!
//! Events emitted after a verification outcome commits. Emission is
//! fire-and-forget: the state change is persisted first, and a failed
//! publish is logged by the caller, never rolled back.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Company;
use crate::shared::error::AppError;

/// Verification outcome events published to downstream consumers
/// (notifications, audit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "d")]
pub enum VerificationEvent {
    #[serde(rename = "COMPANY_KYB_APPROVED")]
    Approved(ApprovedEvent),
    #[serde(rename = "COMPANY_KYB_DENIED")]
    Denied(DeniedEvent),
}

/// Payload for an approved verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedEvent {
    pub company_id: String,
    pub legal_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    pub actor_id: String,
    pub occurred_at: String,
}

/// Payload for a denied verification. The reason is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeniedEvent {
    pub company_id: String,
    pub legal_name: String,
    pub actor_id: String,
    pub reason: String,
    pub occurred_at: String,
}

impl VerificationEvent {
    /// Build an approval event from the persisted company state.
    pub fn approved(actor_id: Uuid, company: &Company) -> Self {
        Self::Approved(ApprovedEvent {
            company_id: company.id.to_string(),
            legal_name: company.legal_name.clone(),
            registration_number: company.registration_number.clone(),
            tier: company.tier.clone(),
            actor_id: actor_id.to_string(),
            occurred_at: Utc::now().to_rfc3339(),
        })
    }

    /// Build a denial event from the persisted company state.
    pub fn denied(actor_id: Uuid, company: &Company, reason: impl Into<String>) -> Self {
        Self::Denied(DeniedEvent {
            company_id: company.id.to_string(),
            legal_name: company.legal_name.clone(),
            actor_id: actor_id.to_string(),
            reason: reason.into(),
            occurred_at: Utc::now().to_rfc3339(),
        })
    }

    /// Get the event name for dispatch
    pub fn event_name(&self) -> &'static str {
        match self {
            VerificationEvent::Approved(_) => "COMPANY_KYB_APPROVED",
            VerificationEvent::Denied(_) => "COMPANY_KYB_DENIED",
        }
    }
}

/// Port for the external event bus.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a verification event.
    async fn publish(&self, event: &VerificationEvent) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_company() -> Company {
        let mut company = Company::new("Acme Ltd", "default");
        company.registration_number = Some("RC123456".to_string());
        company
    }

    #[test]
    fn test_event_name() {
        let company = pending_company();
        let actor = Uuid::new_v4();

        assert_eq!(
            VerificationEvent::approved(actor, &company).event_name(),
            "COMPANY_KYB_APPROVED"
        );
        assert_eq!(
            VerificationEvent::denied(actor, &company, "incomplete").event_name(),
            "COMPANY_KYB_DENIED"
        );
    }

    #[test]
    fn test_denied_event_carries_reason() {
        let company = pending_company();
        let event = VerificationEvent::denied(Uuid::new_v4(), &company, "incomplete documents");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["t"], "COMPANY_KYB_DENIED");
        assert_eq!(json["d"]["reason"], "incomplete documents");
        assert_eq!(json["d"]["legal_name"], "Acme Ltd");
    }

    #[test]
    fn test_approved_event_carries_tier_and_number() {
        let mut company = pending_company();
        company.tier = Some("tier_2".to_string());

        let event = VerificationEvent::approved(Uuid::new_v4(), &company);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["t"], "COMPANY_KYB_APPROVED");
        assert_eq!(json["d"]["registration_number"], "RC123456");
        assert_eq!(json["d"]["tier"], "tier_2");
    }
}
