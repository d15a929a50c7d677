//! Room CRUD
//!
//! GET/POST /api/rooms, PUT/DELETE /api/rooms/{id}

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Room, RoomCreate, RoomUpdate};

use super::validate;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(state.store.list_rooms().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RoomCreate>,
) -> AppResult<Json<Room>> {
    validate::non_empty("name", &payload.name)?;
    validate::capacity(payload.capacity)?;

    let room = state.store.insert_room(&payload).await?;
    tracing::info!(room_id = %room.id, name = %room.name, "Room created");
    Ok(Json(room))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomUpdate>,
) -> AppResult<Json<Room>> {
    validate::path_id(&id)?;
    if let Some(name) = &payload.name {
        validate::non_empty("name", name)?;
    }
    if let Some(capacity) = payload.capacity {
        validate::capacity(capacity)?;
    }

    let room = state
        .store
        .update_room(&id, &payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoomNotFound).with_detail("id", id.as_str()))?;
    Ok(Json(room))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    validate::path_id(&id)?;
    if !state.store.delete_room(&id).await? {
        return Err(AppError::new(ErrorCode::RoomNotFound).with_detail("id", id));
    }
    tracing::info!(room_id = %id, "Room deleted");
    Ok(ApiResponse::ok())
}
