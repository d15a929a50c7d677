//! Housekeeping task CRUD
//!
//! GET/POST /api/housekeeping, PUT/DELETE /api/housekeeping/{id}

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{HousekeepingTask, HousekeepingTaskCreate, HousekeepingTaskUpdate};

use super::validate;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<HousekeepingTask>>> {
    Ok(Json(state.store.list_housekeeping().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<HousekeepingTaskCreate>,
) -> AppResult<Json<HousekeepingTask>> {
    validate::uuid_field("room_id", &payload.room_id)?;
    validate::non_empty("assigned", &payload.assigned)?;

    let task = state.store.insert_housekeeping(&payload).await?;
    tracing::info!(task_id = %task.id, assigned = %task.assigned, "Housekeeping task created");
    Ok(Json(task))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HousekeepingTaskUpdate>,
) -> AppResult<Json<HousekeepingTask>> {
    validate::path_id(&id)?;
    if let Some(room_id) = &payload.room_id {
        validate::uuid_field("room_id", room_id)?;
    }
    if let Some(assigned) = &payload.assigned {
        validate::non_empty("assigned", assigned)?;
    }

    let task = state
        .store
        .update_housekeeping(&id, &payload)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::HousekeepingTaskNotFound).with_detail("id", id.as_str())
        })?;
    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    validate::path_id(&id)?;
    if !state.store.delete_housekeeping(&id).await? {
        return Err(AppError::new(ErrorCode::HousekeepingTaskNotFound).with_detail("id", id));
    }
    tracing::info!(task_id = %id, "Housekeeping task deleted");
    Ok(ApiResponse::ok())
}
