//! Contact relay endpoint

use crate::{
    extractors::ContactFields,
    models::{Field, RelayResult},
    relay::relay_submission,
    AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

/// `POST /contact`
///
/// Answers `{success: true, response}` with 200, or `{success: false, error}`
/// with the status chosen by the configured failure policy.
pub async fn handle_contact(
    State(state): State<AppState>,
    ContactFields(submission): ContactFields,
) -> Response {
    debug!(
        has_email = submission.get(Field::Email).is_some(),
        "POST /contact"
    );

    match relay_submission(state.provider.as_ref(), &state.provider_config, submission).await {
        Ok(response) => (StatusCode::OK, Json(RelayResult::sent(response))).into_response(),
        Err(err) => {
            let status = err.status_code(state.failure_status);
            error!(
                error = %err,
                status = status.as_u16(),
                retryable = err.is_retryable(),
                "contact relay failed"
            );
            (status, Json(RelayResult::failed(err.public_message()))).into_response()
        }
    }
}
