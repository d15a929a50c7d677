//! Shared types for Hotel Autopilot
//!
//! Entity models, the realtime change protocol, and the unified error /
//! response types used by the server and the dashboard client.

pub mod error;
pub mod models;
pub mod realtime;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use realtime::{ChangeEvent, ChangeKind, RealtimeMessage, Table};
