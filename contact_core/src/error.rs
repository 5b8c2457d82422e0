//! Relay error types and their mapping onto HTTP status codes

use crate::config::FailureStatus;
use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

pub const DEFAULT_FAILURE_DETAIL: &str = "Failed to send email";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Email relay is not configured: missing {0}")]
    MissingConfig(&'static str),

    #[error("Email provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl RelayError {
    pub fn status_code(&self, policy: FailureStatus) -> StatusCode {
        match policy {
            FailureStatus::Collapsed => StatusCode::INTERNAL_SERVER_ERROR,
            FailureStatus::Classified => match self {
                RelayError::MissingConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RelayError::Rejected { .. } | RelayError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                RelayError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Message placed in the `error` member of the failure envelope.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::MissingConfig(_) => "Email relay is not configured".to_string(),
            RelayError::Rejected { detail, .. } if detail.trim().is_empty() => {
                DEFAULT_FAILURE_DETAIL.to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RelayError::Transport(_)
                | RelayError::Rejected { .. }
                | RelayError::MalformedResponse(_)
        )
    }
}
