//! Requirement Repository Implementation
//!
//! PostgreSQL implementation of the settings-driven requirement schema.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::{KybRequirement, RequirementKind, RequirementRepository};
use crate::shared::error::AppError;

/// Database row for a requirement schema entry.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RequirementRow {
    name: String,
    kind: String,
    max_length: Option<i32>,
    position: i32,
}

impl RequirementRow {
    fn into_requirement(self) -> Result<KybRequirement, AppError> {
        let kind = RequirementKind::parse(&self.kind).ok_or_else(|| {
            AppError::Internal(format!(
                "Unsupported requirement kind '{}' configured for field '{}'",
                self.kind, self.name
            ))
        })?;

        Ok(KybRequirement {
            name: self.name,
            kind,
            max_length: self.max_length,
            position: self.position,
        })
    }
}

/// PostgreSQL implementation of the RequirementRepository.
pub struct PgRequirementRepository {
    pool: PgPool,
}

impl PgRequirementRepository {
    /// Creates a new PgRequirementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequirementRepository for PgRequirementRepository {
    /// Load the active requirement schema for a company type.
    ///
    /// Returns entries ordered by position; an empty Vec means no schema
    /// is configured for the type.
    async fn active_schema(&self, company_type: &str) -> Result<Vec<KybRequirement>, AppError> {
        let rows = sqlx::query_as::<_, RequirementRow>(
            r#"
            SELECT name, kind, max_length, position
            FROM kyb_requirements
            WHERE company_type = $1 AND active
            ORDER BY position, name
            "#,
        )
        .bind(company_type)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(RequirementRow::into_requirement)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_row_conversion() {
        let row = RequirementRow {
            name: "tax_id".to_string(),
            kind: "text".to_string(),
            max_length: Some(15),
            position: 0,
        };

        let requirement = row.into_requirement().unwrap();
        assert_eq!(requirement.kind, RequirementKind::Text);
        assert_eq!(requirement.max_length, Some(15));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let row = RequirementRow {
            name: "tax_id".to_string(),
            kind: "binary".to_string(),
            max_length: None,
            position: 0,
        };

        assert!(row.into_requirement().is_err());
    }
}
