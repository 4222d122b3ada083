//! Business Registry Client
//!
//! HTTP implementation of the `RegistryClient` port against the configured
//! registry API. The request timeout bounds the highest-latency step of
//! the verification flow.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::RegistrySettings;
use crate::domain::registry::{RegistryClient, RegistryRecord};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// HTTP client for the external business registry.
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistryClient {
    /// Build a client from settings.
    pub fn new(settings: &RegistrySettings) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build registry client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    /// Look up a registration number on the registry.
    ///
    /// A 404 means the registry has no record for the number and maps to
    /// `Ok(None)`; every other non-success status is an upstream failure.
    async fn lookup(&self, registration_number: &str) -> Result<Option<RegistryRecord>, AppError> {
        let url = format!("{}/businesses/{}", self.base_url, registration_number);
        let started = Instant::now();

        let response = self.http.get(&url).send().await.map_err(|e| {
            metrics::record_registry_lookup("error", started.elapsed().as_secs_f64());
            AppError::Upstream(format!("Registry request failed: {}", e))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            metrics::record_registry_lookup("miss", started.elapsed().as_secs_f64());
            return Ok(None);
        }

        if !response.status().is_success() {
            metrics::record_registry_lookup("error", started.elapsed().as_secs_f64());
            return Err(AppError::Upstream(format!(
                "Registry returned status {}",
                response.status()
            )));
        }

        let record = response.json::<RegistryRecord>().await.map_err(|e| {
            metrics::record_registry_lookup("error", started.elapsed().as_secs_f64());
            AppError::Upstream(format!("Registry returned a malformed record: {}", e))
        })?;

        metrics::record_registry_lookup("hit", started.elapsed().as_secs_f64());
        Ok(Some(record))
    }
}
