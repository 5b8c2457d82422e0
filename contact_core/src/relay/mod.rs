//! Server-side relay from a contact submission to the email provider

pub mod payload;
pub mod provider;

pub use payload::{ProviderCredentials, RelayPayload};
pub use provider::{EmailJsProvider, EmailProvider, ProviderBody, ProviderReply};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::models::ContactSubmission;
use serde_json::Value;
use tracing::{debug, info};

/// Resolve credentials, call the provider once and normalize its reply.
///
/// Returns the parsed provider body on a 2xx reply.
pub async fn relay_submission(
    provider: &dyn EmailProvider,
    config: &ProviderConfig,
    submission: ContactSubmission,
) -> Result<Value> {
    let credentials = ProviderCredentials::resolve(config)?;

    let missing = submission.missing_fields();
    if !missing.is_empty() {
        debug!(missing = ?missing, "relaying submission with absent fields");
    }

    let payload = RelayPayload::new(credentials, submission);
    let reply = provider.send(&payload).await?;
    let status = reply.status;
    let response = reply.into_result()?;

    info!(status = status.as_u16(), "contact submission relayed");
    Ok(response)
}
