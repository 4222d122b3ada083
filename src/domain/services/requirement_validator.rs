//! Requirement Validator
//!
//! Pure validation of a raw submission against the active requirement
//! schema. No side effects; the caller decides what to do with the
//! accepted fields.

use std::collections::BTreeMap;

use crate::domain::entities::{KybRequirement, RequirementKind};

/// A submission rejected by the requirement schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequirementViolation {
    #[error("Field '{field}' exceeds the maximum length of {limit} characters")]
    FieldTooLong { field: String, limit: i32 },

    #[error("Field '{field}' does not accept a {given} value")]
    KindMismatch {
        field: String,
        given: RequirementKind,
    },
}

/// Validate submitted text fields against the schema.
///
/// Returns the accepted subset of the input:
/// - fields not declared in the schema are silently dropped, tolerating
///   schema evolution on either side;
/// - a declared text field longer than its `max_length` fails the whole
///   submission with `FieldTooLong`;
/// - a text value for a field declared as a file fails with `KindMismatch`
///   (the field is declared, so the permissive drop does not apply).
///
/// Validation is all-or-nothing: the first violation aborts and nothing
/// from the submission is accepted.
pub fn validate_text_fields(
    schema: &[KybRequirement],
    input: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, RequirementViolation> {
    let mut accepted = BTreeMap::new();

    for (name, value) in input {
        let Some(requirement) = schema.iter().find(|r| &r.name == name) else {
            continue;
        };

        match requirement.kind {
            RequirementKind::File => {
                return Err(RequirementViolation::KindMismatch {
                    field: name.clone(),
                    given: RequirementKind::Text,
                });
            }
            RequirementKind::Text => {
                if let Some(limit) = requirement.max_length {
                    if value.chars().count() as i32 > limit {
                        return Err(RequirementViolation::FieldTooLong {
                            field: name.clone(),
                            limit,
                        });
                    }
                }
                accepted.insert(name.clone(), value.clone());
            }
        }
    }

    Ok(accepted)
}

/// Validate uploaded file field names against the schema.
///
/// Returns the accepted field names, applying the same permissive policy as
/// text fields: undeclared names are dropped, a file upload for a declared
/// text field fails with `KindMismatch`.
pub fn validate_file_fields<'a>(
    schema: &[KybRequirement],
    names: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<String>, RequirementViolation> {
    let mut accepted = Vec::new();

    for name in names {
        let Some(requirement) = schema.iter().find(|r| r.name == name) else {
            continue;
        };

        match requirement.kind {
            RequirementKind::Text => {
                return Err(RequirementViolation::KindMismatch {
                    field: name.to_string(),
                    given: RequirementKind::File,
                });
            }
            RequirementKind::File => accepted.push(name.to_string()),
        }
    }

    Ok(accepted)
}
