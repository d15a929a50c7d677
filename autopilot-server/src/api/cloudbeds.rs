//! Provider-style reservation feed
//!
//! GET /api/cloudbeds/reservations?status=&from=&to=

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use shared::models::{ReservationFilter, ReservationStatus, ReservationWithRoom};
use shared::util::{is_date_pattern, now_iso};

use crate::state::AppState;

pub const PROVIDER: &str = "cloudbeds-mock";

const FALLBACK_ERROR: &str = "Unable to fetch reservations";

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReservationQuery {
    /// Unrecognised status values and malformed dates are dropped, not rejected
    pub fn into_filter(self) -> ReservationFilter {
        ReservationFilter {
            status: self.status.as_deref().and_then(ReservationStatus::from_db),
            from: self.from.filter(|d| is_date_pattern(d)),
            to: self.to.filter(|d| is_date_pattern(d)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderReservations {
    pub provider: &'static str,
    pub count: usize,
    pub synced_at: String,
    pub reservations: Vec<ReservationWithRoom>,
}

pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> Response {
    let filter = query.into_filter();

    match state.store.select_reservations(&filter).await {
        Ok(reservations) => Json(ProviderReservations {
            provider: PROVIDER,
            count: reservations.len(),
            synced_at: now_iso(),
            reservations,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch reservations");
            let message = e.to_string();
            let error = if message.trim().is_empty() {
                FALLBACK_ERROR.to_string()
            } else {
                message
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "provider": PROVIDER, "error": error })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::FailingStore;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    #[test]
    fn test_query_into_filter() {
        let filter = ReservationQuery {
            status: Some("checked_out".into()),
            from: Some("2024-05-01".into()),
            to: Some("2024-05-31".into()),
        }
        .into_filter();
        assert_eq!(filter.status, Some(ReservationStatus::CheckedOut));
        assert_eq!(filter.from.as_deref(), Some("2024-05-01"));
        assert_eq!(filter.to.as_deref(), Some("2024-05-31"));
    }

    #[test]
    fn test_invalid_query_values_ignored() {
        let filter = ReservationQuery {
            status: Some("no_show".into()),
            from: Some("yesterday".into()),
            to: Some(String::new()),
        }
        .into_filter();
        assert_eq!(filter, ReservationFilter::default());
    }

    #[tokio::test]
    async fn test_store_failure_body() {
        let state = AppState::with_store(Arc::new(FailingStore::new("pool timed out")), "anon");
        let response = list_reservations(State(state), Query(ReservationQuery::default())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["provider"], PROVIDER);
        assert!(body["error"].as_str().unwrap().contains("pool timed out"));
    }
}
