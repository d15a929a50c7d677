//! Unified error codes for Hotel Autopilot
//!
//! This module defines all error codes shared by the server, the client
//! and the dashboard. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Room errors
//! - 3xxx: Reservation errors
//! - 4xxx: Housekeeping errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Caller did not present an API key
    NotAuthenticated = 1001,
    /// API key does not match the configured key
    ApiKeyInvalid = 1002,

    // ==================== 2xxx: Room ====================
    /// Room not found
    RoomNotFound = 2001,
    /// Room capacity must be positive
    RoomInvalidCapacity = 2002,

    // ==================== 3xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 3001,
    /// Date is not in YYYY-MM-DD form
    ReservationInvalidDate = 3003,

    // ==================== 4xxx: Housekeeping ====================
    /// Housekeeping task not found
    HousekeepingTaskNotFound = 4001,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "API key is required",
            ErrorCode::ApiKeyInvalid => "API key is invalid",

            // Room
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::RoomInvalidCapacity => "Room capacity must be a positive integer",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationInvalidDate => "Date must be in YYYY-MM-DD format",

            // Housekeeping
            ErrorCode::HousekeepingTaskNotFound => "Housekeeping task not found",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::ApiKeyInvalid),

            // Room
            2001 => Ok(ErrorCode::RoomNotFound),
            2002 => Ok(ErrorCode::RoomInvalidCapacity),

            // Reservation
            3001 => Ok(ErrorCode::ReservationNotFound),
            3003 => Ok(ErrorCode::ReservationInvalidDate),

            // Housekeeping
            4001 => Ok(ErrorCode::HousekeepingTaskNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
