//! Reservation webhook processor
//!
//! Validates an inbound provider event and applies exactly one mutation to
//! the reservations table:
//!
//! | event                   | id present        | id absent        |
//! |-------------------------|-------------------|------------------|
//! | `reservation.created`   | upsert on id      | insert           |
//! | `reservation.updated`   | upsert on id      | insert           |
//! | `reservation.cancelled` | status→cancelled  | 400, no store call |
//!
//! Any store failure during the mutation or its read-back becomes a 500
//! carrying the store's message.

mod payload;

pub use payload::{ReservationPayload, ValidationDetails, WebhookEnvelope, WebhookEvent};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use shared::models::{Reservation, ReservationStatus};

use crate::store::{DataStore, StoreResult};

/// Used when a store failure carries no message
pub const FALLBACK_FAILURE_MESSAGE: &str = "Unknown webhook failure";

/// Status code plus JSON body returned to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl WebhookResponse {
    /// Body was not parseable JSON at all
    pub fn malformed_json() -> Self {
        Self::rejected(json!({ "ok": false, "error": "Request body must be JSON" }))
    }

    pub fn invalid(details: &ValidationDetails) -> Self {
        Self::rejected(json!({ "ok": false, "error": "Invalid payload", "details": details }))
    }

    pub fn missing_cancel_id() -> Self {
        Self::rejected(json!({
            "ok": false,
            "error": "reservation.id is required for cancellation events",
        }))
    }

    pub fn cancelled(reservation_id: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "ok": true, "action": "cancelled", "reservation_id": reservation_id }),
        }
    }

    pub fn applied(event: WebhookEvent, reservation: &Reservation) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "ok": true, "action": event, "reservation": reservation }),
        }
    }

    pub fn store_failure(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE
        } else {
            message
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "ok": false, "error": message }),
        }
    }

    fn rejected(body: Value) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Process one parsed webhook body
pub async fn process(store: &dyn DataStore, payload: &Value) -> WebhookResponse {
    let envelope = match WebhookEnvelope::parse(payload) {
        Ok(envelope) => envelope,
        Err(details) => {
            tracing::warn!(
                event = payload.get("event").and_then(serde_json::Value::as_str).unwrap_or(""),
                fields = ?details.field_errors.keys().collect::<Vec<_>>(),
                "Rejected webhook payload"
            );
            return WebhookResponse::invalid(&details);
        }
    };

    let event = envelope.event;
    let reservation_id = envelope.reservation.id.clone();

    match apply(store, envelope).await {
        Ok(response) => {
            tracing::info!(
                event = event.as_str(),
                reservation_id = reservation_id.as_deref().unwrap_or("<new>"),
                status = response.status.as_u16(),
                "Webhook processed"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                event = event.as_str(),
                reservation_id = reservation_id.as_deref().unwrap_or("<new>"),
                error = %e,
                "Webhook store failure"
            );
            WebhookResponse::store_failure(&e.to_string())
        }
    }
}

async fn apply(store: &dyn DataStore, envelope: WebhookEnvelope) -> StoreResult<WebhookResponse> {
    let WebhookEnvelope { event, reservation } = envelope;

    if event == WebhookEvent::Cancelled {
        let Some(id) = reservation.id else {
            return Ok(WebhookResponse::missing_cancel_id());
        };
        let touched = store
            .set_reservation_status(&id, ReservationStatus::Cancelled)
            .await?;
        if touched == 0 {
            tracing::debug!(reservation_id = %id, "Cancellation matched no reservation");
        }
        return Ok(WebhookResponse::cancelled(&id));
    }

    let (id, record) = reservation.into_record(event);
    let row = match id {
        Some(id) => store.upsert_reservation(&id, &record).await?,
        None => store.insert_reservation(&record).await?,
    };
    Ok(WebhookResponse::applied(event, &row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::test_support::FailingStore;
    use shared::models::ReservationFilter;

    const ROOM: &str = "123e4567-e89b-12d3-a456-426614174000";
    const RES: &str = "9b2f7c1e-3d4a-4f5b-8c6d-7e8f9a0b1c2d";

    fn event(name: &str, reservation: Value) -> Value {
        json!({ "event": name, "reservation": reservation })
    }

    fn booking() -> Value {
        json!({
            "room_id": ROOM,
            "guest": "Ada Lovelace",
            "checkin": "2024-05-01",
            "checkout": "2024-05-04"
        })
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_store_call() {
        let store = MemoryStore::default();
        let mut rx = store.changes().subscribe(shared::Table::Reservations);

        let response = process(&store, &event("reservation.created", json!({}))).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["ok"], false);
        assert_eq!(response.body["error"], "Invalid payload");
        let fields = response.body["details"]["field_errors"].as_object().unwrap();
        assert!(fields.contains_key("reservation.guest"));
        assert!(rx.try_recv().is_err());
        assert!(store.list_reservations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calendar_invalid_date_passes_validation() {
        let store = MemoryStore::default();
        let mut reservation = booking();
        reservation["checkin"] = json!("2024-02-30");

        let response = process(&store, &event("reservation.created", reservation)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["reservation"]["checkin"], "2024-02-30");
    }

    #[tokio::test]
    async fn test_cancel_without_id() {
        // Any store call would turn into a 500 carrying this message.
        let store = FailingStore::new("store must not be touched");
        let response = process(&store, &event("reservation.cancelled", booking())).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body,
            json!({
                "ok": false,
                "error": "reservation.id is required for cancellation events"
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_still_succeeds() {
        let store = MemoryStore::default();
        let mut reservation = booking();
        reservation["id"] = json!(RES);

        let response = process(&store, &event("reservation.cancelled", reservation)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            json!({ "ok": true, "action": "cancelled", "reservation_id": RES })
        );
        assert!(store.list_reservations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_existing_sets_status() {
        let store = MemoryStore::default();
        let mut reservation = booking();
        reservation["id"] = json!(RES);
        process(&store, &event("reservation.created", reservation.clone())).await;

        let response = process(&store, &event("reservation.cancelled", reservation)).await;

        assert_eq!(response.status, StatusCode::OK);
        let rows = store.list_reservations().await.unwrap();
        assert_eq!(rows[0].status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_created_defaults_to_confirmed() {
        let store = MemoryStore::default();
        let response = process(&store, &event("reservation.created", booking())).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["action"], "reservation.created");
        assert_eq!(response.body["reservation"]["status"], "confirmed");

        let stored = store.list_reservations().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            response.body["reservation"],
            serde_json::to_value(&stored[0]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_updated_unknown_id_creates_row() {
        let store = MemoryStore::default();
        let mut reservation = booking();
        reservation["id"] = json!(RES);

        let response = process(&store, &event("reservation.updated", reservation)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["action"], "reservation.updated");
        assert_eq!(response.body["reservation"]["id"], RES);
        assert_eq!(response.body["reservation"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_replayed_update_is_idempotent() {
        let store = MemoryStore::default();
        let mut reservation = booking();
        reservation["id"] = json!(RES);
        reservation["status"] = json!("checked_in");
        let payload = event("reservation.updated", reservation);

        let first = process(&store, &payload).await;
        let second = process(&store, &payload).await;

        assert_eq!(first.body, second.body);
        let rows = store
            .select_reservations(&ReservationFilter::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reservation.status, ReservationStatus::CheckedIn);
    }

    #[tokio::test]
    async fn test_store_failure_message_passthrough() {
        let store = FailingStore::new("connection reset by peer");
        let response = process(&store, &event("reservation.created", booking())).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body["ok"], false);
        assert!(
            response.body["error"]
                .as_str()
                .unwrap()
                .contains("connection reset by peer")
        );
    }

    #[tokio::test]
    async fn test_validation_runs_before_store() {
        let store = FailingStore::new("unreachable");
        let response = process(&store, &json!("reservation.created")).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["details"]["form_errors"][0],
            "Expected object, received string"
        );
    }

    #[test]
    fn test_empty_failure_message_falls_back() {
        let response = WebhookResponse::store_failure("  ");
        assert_eq!(response.body["error"], FALLBACK_FAILURE_MESSAGE);
    }
}
