//! Client to relay transport

use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Raw relay answer. Interpretation is left to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// POST a urlencoded form body to the relay endpoint.
    async fn post_form(&self, body: String) -> Result<TransportReply, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpRelayTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn post_form(&self, body: String) -> Result<TransportReply, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportReply { status, body })
    }
}
