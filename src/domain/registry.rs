//! Business Registry Port
//!
//! Trait consumed by the verification flow to cross-check a claimed
//! registration number against the external business registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Record returned by the registry for a registration number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Legal name the registry holds for this number
    pub legal_name: String,

    /// Tier classification assigned by the registry
    pub tier: String,
}

/// Client for the external business registry.
///
/// The lookup is the highest-latency step of the verification flow and runs
/// only after all local validation, so a transport failure cannot corrupt
/// already-merged submission data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Look up a registration number.
    ///
    /// Returns `Ok(None)` when the registry has no record for the number;
    /// transport and protocol failures surface as `AppError::Upstream`.
    async fn lookup(&self, registration_number: &str) -> Result<Option<RegistryRecord>, AppError>;
}
