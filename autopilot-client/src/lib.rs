//! Autopilot Client - dashboard side of Hotel Autopilot
//!
//! Session-scoped HTTP calls to autopilot-server, the realtime change
//! listener and the dashboard controller built on both.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod realtime;

pub use config::ClientConfig;
pub use dashboard::Dashboard;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use realtime::RealtimeListener;

// Re-export shared types for convenience
pub use shared::{ApiResponse, RealtimeMessage, Table};
