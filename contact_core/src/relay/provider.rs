//! Outbound call to the transactional-email provider

use super::payload::RelayPayload;
use crate::config::ProviderConfig;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Provider response body, decoded according to its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderBody {
    Json(Value),
    Text(String),
}

impl ProviderBody {
    /// A missing or non-JSON content type keeps the body as text.
    pub fn decode(content_type: Option<&HeaderValue>, bytes: &[u8]) -> Result<Self> {
        if declares_json(content_type) {
            serde_json::from_slice(bytes)
                .map(ProviderBody::Json)
                .map_err(|e| RelayError::MalformedResponse(e.to_string()))
        } else {
            Ok(ProviderBody::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ProviderBody::Json(value) => value,
            ProviderBody::Text(text) => Value::String(text),
        }
    }

    /// Human-readable error detail for a rejected request.
    pub fn detail(&self) -> String {
        match self {
            ProviderBody::Text(text) => text.trim().to_string(),
            ProviderBody::Json(Value::String(text)) => text.trim().to_string(),
            ProviderBody::Json(Value::Null) => String::new(),
            ProviderBody::Json(Value::Object(map)) => ["error", "message"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
            ProviderBody::Json(other) => other.to_string(),
        }
    }
}

fn declares_json(content_type: Option<&HeaderValue>) -> bool {
    let Some(raw) = content_type.and_then(|value| value.to_str().ok()) else {
        return false;
    };

    match raw.parse::<mime::Mime>() {
        Ok(parsed) => {
            parsed.type_() == mime::APPLICATION
                && (parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
        }
        Err(_) => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: ProviderBody,
}

impl ProviderReply {
    pub fn into_result(self) -> Result<Value> {
        if self.status.is_success() {
            Ok(self.body.into_value())
        } else {
            Err(RelayError::Rejected {
                status: self.status,
                detail: self.body.detail(),
            })
        }
    }
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, payload: &RelayPayload) -> Result<ProviderReply>;
}

/// EmailJS REST API. One POST per call; no timeout, retry or backoff.
#[derive(Debug, Clone)]
pub struct EmailJsProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl EmailJsProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.endpoint.clone())
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EmailProvider for EmailJsProvider {
    async fn send(&self, payload: &RelayPayload) -> Result<ProviderReply> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        debug!(
            status = status.as_u16(),
            content_type = ?content_type,
            "provider responded"
        );

        let bytes = response.bytes().await?;
        let body = ProviderBody::decode(content_type.as_ref(), &bytes)?;

        Ok(ProviderReply { status, body })
    }
}
