//! Provider credentials and the JSON payload sent to the provider

use crate::config::ProviderConfig;
use crate::error::{RelayError, Result};
use crate::models::ContactSubmission;
use serde::Serialize;

/// Identifiers resolved from configuration for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl ProviderCredentials {
    pub fn resolve(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            service_id: required(&config.service_id, "service_id")?,
            template_id: required(&config.template_id, "template_id")?,
            public_key: required(&config.public_key, "public_key")?,
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(RelayError::MissingConfig(name)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayPayload {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: ContactSubmission,
}

impl RelayPayload {
    pub fn new(credentials: ProviderCredentials, submission: ContactSubmission) -> Self {
        Self {
            service_id: credentials.service_id,
            template_id: credentials.template_id,
            user_id: credentials.public_key,
            template_params: submission,
        }
    }
}
