use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::interface_adapters::state::AppState;
use crate::use_cases::webhook::HandleWebhookUseCase;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

// Provider event endpoint. Answers with a bare status, never an envelope.
#[tracing::instrument(name = "webhook", skip_all)]
pub async fn receive_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let use_case = HandleWebhookUseCase {
        verifier: state.verifier.as_ref(),
        handler: state.events.as_ref(),
    };

    match use_case.execute(&body, signature).await {
        Ok(kind) => {
            tracing::debug!(event_type = kind.as_str(), "webhook event accepted.");
            StatusCode::OK
        }
        Err(err) => {
            tracing::warn!(error = %err, "webhook event rejected.");
            StatusCode::BAD_REQUEST
        }
    }
}
