//! KYB requirement entity and repository trait.
//!
//! Maps to the `kyb_requirements` table. Requirements are configured at
//! runtime per company type; the onboarding core never hard-codes field
//! names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Primitive type of a requirement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Text,
    File,
}

impl RequirementKind {
    /// Parse the database string representation.
    ///
    /// Returns None for kinds this service does not understand, so a
    /// misconfigured schema row is surfaced instead of silently skipped.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry of the active requirement schema.
///
/// Maps to the `kyb_requirements` table:
/// - company_type: VARCHAR(64) NOT NULL
/// - name: VARCHAR(64) NOT NULL, unique per company type
/// - kind: VARCHAR(10) NOT NULL ('text' | 'file')
/// - max_length: INTEGER NULL, applies only to kind = 'text'
/// - position: INTEGER NOT NULL (ordering hint for callers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KybRequirement {
    /// Field name, matches a `kyb_data` key
    pub name: String,

    /// Primitive type of the field
    pub kind: RequirementKind,

    /// Maximum character length for text fields
    pub max_length: Option<i32>,

    /// Ordering hint
    pub position: i32,
}

impl KybRequirement {
    /// A text requirement with an optional length cap.
    pub fn text(name: impl Into<String>, max_length: Option<i32>, position: i32) -> Self {
        Self {
            name: name.into(),
            kind: RequirementKind::Text,
            max_length,
            position,
        }
    }

    /// A file requirement.
    pub fn file(name: impl Into<String>, position: i32) -> Self {
        Self {
            name: name.into(),
            kind: RequirementKind::File,
            max_length: None,
            position,
        }
    }
}

/// Repository trait for the runtime-configured requirement schema.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequirementRepository: Send + Sync {
    /// Load the active requirement schema for a company type, ordered by
    /// position. An empty result means no schema is configured.
    async fn active_schema(&self, company_type: &str) -> Result<Vec<KybRequirement>, AppError>;
}
