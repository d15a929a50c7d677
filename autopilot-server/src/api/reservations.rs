//! Reservation CRUD for the dashboard
//!
//! GET/POST /api/reservations, PUT/DELETE /api/reservations/{id}

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};

use super::validate;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.store.list_reservations().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    validate::uuid_field("room_id", &payload.room_id)?;
    validate::non_empty("guest", &payload.guest)?;
    validate::date("checkin", &payload.checkin)?;
    validate::date("checkout", &payload.checkout)?;

    let reservation = state.store.insert_reservation(&payload).await?;
    tracing::info!(reservation_id = %reservation.id, "Reservation created");
    Ok(Json(reservation))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    validate::path_id(&id)?;
    if let Some(room_id) = &payload.room_id {
        validate::uuid_field("room_id", room_id)?;
    }
    if let Some(guest) = &payload.guest {
        validate::non_empty("guest", guest)?;
    }
    if let Some(checkin) = &payload.checkin {
        validate::date("checkin", checkin)?;
    }
    if let Some(checkout) = &payload.checkout {
        validate::date("checkout", checkout)?;
    }

    let reservation = state
        .store
        .update_reservation(&id, &payload)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id.as_str())
        })?;
    Ok(Json(reservation))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    validate::path_id(&id)?;
    if !state.store.delete_reservation(&id).await? {
        return Err(AppError::new(ErrorCode::ReservationNotFound).with_detail("id", id));
    }
    tracing::info!(reservation_id = %id, "Reservation deleted");
    Ok(ApiResponse::ok())
}
