//! Input checks shared by the dashboard handlers

use shared::error::{AppError, AppResult, ErrorCode};
use shared::util::{is_date_pattern, is_uuid};

/// Path ids must look like store-issued UUIDs
pub fn path_id(id: &str) -> AppResult<()> {
    if is_uuid(id) {
        Ok(())
    } else {
        Err(AppError::with_message(ErrorCode::InvalidFormat, "id must be a UUID").with_detail("id", id))
    }
}

pub fn uuid_field(field: &str, value: &str) -> AppResult<()> {
    if is_uuid(value) {
        Ok(())
    } else {
        Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be a UUID"))
                .with_detail("field", field),
        )
    }
}

pub fn non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
                .with_detail("field", field),
        )
    } else {
        Ok(())
    }
}

pub fn date(field: &str, value: &str) -> AppResult<()> {
    if is_date_pattern(value) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::ReservationInvalidDate,
            format!("{field} must be YYYY-MM-DD"),
        )
        .with_detail("field", field))
    }
}

pub fn capacity(value: i32) -> AppResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::RoomInvalidCapacity).with_detail("capacity", value))
    }
}
