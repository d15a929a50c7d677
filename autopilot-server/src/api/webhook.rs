//! Provider webhook handler
//!
//! POST /webhook, POST /api/webhook/cloudbeds

use axum::body::Bytes;
use axum::extract::State;

use crate::state::AppState;
use crate::webhook::{self, WebhookResponse};

/// Reads the raw body so that unparseable JSON gets the webhook's own
/// error shape instead of axum's extractor rejection.
pub async fn handle_webhook(State(state): State<AppState>, body: Bytes) -> WebhookResponse {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return WebhookResponse::malformed_json();
        }
    };

    webhook::process(state.store.as_ref(), &payload).await
}
