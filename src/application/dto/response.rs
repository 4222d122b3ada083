//! Response DTOs
//!
//! Data structures for API response bodies. KYB file values render as
//! metadata only; raw bytes never leave the service through this surface.

use serde::Serialize;

use crate::application::services::{SubmissionAckDto, VerificationOutcomeDto};
use crate::domain::entities::Company;
use crate::domain::value_objects::KybValue;

/// A single KYB field as rendered to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KybFieldView {
    Text {
        value: String,
    },
    File {
        file_name: String,
        checksum: String,
        size_bytes: u64,
    },
}

impl KybFieldView {
    /// Render a stored value, matching both variants exhaustively.
    fn from_value(value: &KybValue) -> Self {
        match value {
            KybValue::Text { value } => Self::Text {
                value: value.clone(),
            },
            KybValue::File(descriptor) => Self::File {
                file_name: descriptor.file_name.clone(),
                checksum: descriptor.checksum.clone(),
                size_bytes: descriptor.size(),
            },
        }
    }
}

/// A named, rendered KYB field.
#[derive(Debug, Clone, Serialize)]
pub struct KybFieldEntry {
    pub name: String,
    #[serde(flatten)]
    pub value: KybFieldView,
}

/// Company entity view.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub legal_name: String,
    pub company_type: String,
    pub registration_number: Option<String>,
    pub is_verified: bool,
    pub verification_status: String,
    pub tier: Option<String>,
    pub kyb_data: Vec<KybFieldEntry>,
    pub created_at: String,
    pub updated_at: String,
}

impl CompanyResponse {
    /// Build the view from the domain entity.
    pub fn from_company(company: Company) -> Self {
        let kyb_data = company
            .kyb_data
            .iter()
            .map(|(name, value)| KybFieldEntry {
                name: name.clone(),
                value: KybFieldView::from_value(value),
            })
            .collect();

        Self {
            id: company.id.to_string(),
            legal_name: company.legal_name,
            company_type: company.company_type,
            registration_number: company.registration_number,
            is_verified: company.is_verified,
            verification_status: company.verification_status.to_string(),
            tier: company.tier,
            kyb_data,
            created_at: company.created_at.to_rfc3339(),
            updated_at: company.updated_at.to_rfc3339(),
        }
    }
}

/// Acknowledgement for an accepted KYB submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub company_id: String,
    pub verification_status: String,
    pub accepted_fields: Vec<String>,
    pub stored_field_count: usize,
}

impl From<SubmissionAckDto> for SubmissionResponse {
    fn from(ack: SubmissionAckDto) -> Self {
        Self {
            company_id: ack.company_id,
            verification_status: ack.verification_status,
            accepted_fields: ack.accepted_fields,
            stored_field_count: ack.stored_field_count,
        }
    }
}

/// Outcome of a verification decision.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    pub company_id: String,
    pub verification_status: String,
    pub is_verified: bool,
    pub tier: Option<String>,
}

impl From<VerificationOutcomeDto> for VerificationResponse {
    fn from(outcome: VerificationOutcomeDto) -> Self {
        Self {
            company_id: outcome.company_id,
            verification_status: outcome.verification_status,
            is_verified: outcome.is_verified,
            tier: outcome.tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::KybValue;

    #[test]
    fn test_company_response_renders_file_metadata_without_bytes() {
        let mut company = Company::new("Acme Ltd", "default");
        company.kyb_data = [
            ("tax_id".to_string(), KybValue::text("123")),
            (
                "license".to_string(),
                KybValue::file("license.pdf", vec![1, 2, 3]),
            ),
        ]
        .into_iter()
        .collect();

        let response = CompanyResponse::from_company(company);
        let json = serde_json::to_value(&response).unwrap();

        let fields = json["kyb_data"].as_array().unwrap();
        assert_eq!(fields.len(), 2);

        let license = fields
            .iter()
            .find(|f| f["name"] == "license")
            .expect("license field missing");
        assert_eq!(license["kind"], "file");
        assert_eq!(license["file_name"], "license.pdf");
        assert_eq!(license["size_bytes"], 3);
        assert!(license.get("data").is_none());
    }

    #[test]
    fn test_company_response_renders_text_value() {
        let mut company = Company::new("Acme Ltd", "default");
        company.kyb_data = [("tax_id".to_string(), KybValue::text("123"))]
            .into_iter()
            .collect();

        let response = CompanyResponse::from_company(company);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["kyb_data"][0]["kind"], "text");
        assert_eq!(json["kyb_data"][0]["value"], "123");
    }
}
